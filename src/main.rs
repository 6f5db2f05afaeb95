//! CA-Hash Chain Simulator CLI
//!
//! # Commands
//!
//! - `hash` - Hash a string with the configured provider
//! - `mine` - Build and validate a chain
//! - `avalanche` / `distribution` / `survey` - Statistical checks of CA-Hash
//! - `merkle` - Merkle root of a transaction list
//! - `stake` - Seeded proof-of-stake validator draws
//! - `sweep` - Mining cost across difficulties
//! - `benchmark` - Hash rate of the configured provider
//! - `demo` - End-to-end walkthrough

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::Level;

use cahash::algorithm::stats::{avalanche_test, bit_distribution_test, rule_survey};
use cahash::algorithm::{self, Rule, DEFAULT_STEPS};
use cahash::block::{now_iso8601, Block};
use cahash::merkle::transactions_root;
use cahash::stake::{select_validator, stake_table, StakeEntry};
use cahash::{BlockHasher, HashMode, SimConfig, Transaction};

#[derive(Parser)]
#[command(name = "cahash")]
#[command(author = "Cyberia")]
#[command(version = "0.1.0")]
#[command(about = "Blockchain simulator comparing SHA-256 and cellular-automaton block hashing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (flags below override its values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Block hash mode
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,

    /// Elementary CA rule (0-255)
    #[arg(long, global = true)]
    rule: Option<u32>,

    /// CA generations per digest
    #[arg(long, global = true)]
    steps: Option<usize>,

    /// Required leading zero hex digits
    #[arg(short, long, global = true)]
    difficulty: Option<usize>,

    /// Mining threads (0 = number of CPU cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// Give up on a block after this many nonce increments
    #[arg(long, global = true)]
    max_iterations: Option<u64>,

    /// Seed for statistical tests and validator draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// SHA-256
    Reference,
    /// Cellular-automaton hash
    Cellular,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a string with the configured provider
    Hash {
        /// Text to hash
        text: String,
    },

    /// Mine a genesis block plus N blocks and validate the chain
    Mine {
        /// Number of blocks after genesis
        #[arg(short, long, default_value = "2")]
        blocks: usize,

        /// Extra block committing to these transactions (sender:receiver:amount)
        #[arg(long = "tx")]
        transactions: Vec<Transaction>,

        /// Print the chain as JSON
        #[arg(long)]
        json: bool,
    },

    /// Average output bits flipped by a one-bit input change
    Avalanche,

    /// Share of set bits across labelled digests
    Distribution,

    /// Compare avalanche and distribution across rules
    Survey {
        /// Rules to compare
        #[arg(long, value_delimiter = ',', default_value = "30,90,110,150")]
        rules: Vec<u8>,
    },

    /// Merkle root of a transaction list
    Merkle {
        /// Transactions as sender:receiver:amount
        #[arg(required = true)]
        transactions: Vec<Transaction>,
    },

    /// Draw proof-of-stake validators
    Stake {
        /// Validator stake as name=weight
        #[arg(long = "validator", required = true)]
        validators: Vec<StakeEntry>,

        /// Number of draws
        #[arg(short = 'n', long, default_value = "1")]
        draws: usize,
    },

    /// Mining cost across a range of difficulties
    Sweep {
        /// First difficulty
        #[arg(long, default_value = "1")]
        from: usize,

        /// Last difficulty
        #[arg(long, default_value = "4")]
        to: usize,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute
        #[arg(short, long, default_value = "1000")]
        count: u32,
    },

    /// Hello vector, a two-block chain and the statistical checks
    Demo,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = build_config(&cli).and_then(|config| match &cli.command {
        Commands::Hash { text } => cmd_hash(&config, text),
        Commands::Mine {
            blocks,
            transactions,
            json,
        } => cmd_mine(&config, *blocks, transactions, *json),
        Commands::Avalanche => cmd_avalanche(&config),
        Commands::Distribution => cmd_distribution(&config),
        Commands::Survey { rules } => cmd_survey(&config, rules),
        Commands::Merkle { transactions } => cmd_merkle(transactions),
        Commands::Stake { validators, draws } => cmd_stake(&config, validators, *draws),
        Commands::Sweep { from, to } => cmd_sweep(&config, *from, *to),
        Commands::Benchmark { count } => cmd_benchmark(&config, *count),
        Commands::Demo => cmd_demo(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the effective config: file (or defaults), then CLI overrides
fn build_config(cli: &Cli) -> anyhow::Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };

    let (mut rule, mut steps) = ca_params(&config);
    if let Some(r) = cli.rule {
        rule = Rule::try_from(r)?;
    }
    if let Some(s) = cli.steps {
        steps = s;
    }
    let ca_overridden = cli.rule.is_some() || cli.steps.is_some();

    config.hash = match cli.mode {
        Some(ModeArg::Reference) if ca_overridden => {
            bail!("--rule and --steps only apply to --mode cellular")
        }
        Some(ModeArg::Reference) => HashMode::Reference,
        Some(ModeArg::Cellular) => HashMode::Cellular { rule, steps },
        None if ca_overridden => HashMode::Cellular { rule, steps },
        None => config.hash,
    };

    if let Some(d) = cli.difficulty {
        config.difficulty = d;
    }
    if let Some(t) = cli.threads {
        config.threads = if t == 0 { num_cpus::get() } else { t };
    }
    if let Some(m) = cli.max_iterations {
        config.max_iterations = Some(m);
    }
    if let Some(s) = cli.seed {
        config.seed = s;
    }

    config.validate()?;
    Ok(config)
}

/// CA parameters for the statistical commands (defaults when mode is reference)
fn ca_params(config: &SimConfig) -> (Rule, usize) {
    match config.hash {
        HashMode::Cellular { rule, steps } => (rule, steps),
        HashMode::Reference => (Rule::default(), DEFAULT_STEPS),
    }
}

fn describe_mode(mode: &HashMode) -> String {
    match mode {
        HashMode::Reference => "SHA-256".to_string(),
        HashMode::Cellular { rule, steps } => format!("CA-Hash ({}, {} steps)", rule, steps),
    }
}

fn cmd_hash(config: &SimConfig, text: &str) -> anyhow::Result<()> {
    let provider = config.provider()?;
    println!("{}", provider.hash(text.as_bytes())?);
    Ok(())
}

fn cmd_mine(
    config: &SimConfig,
    blocks: usize,
    transactions: &[Transaction],
    json: bool,
) -> anyhow::Result<()> {
    let mut chain = config.chain()?;

    println!("=== CA-Hash Chain ===");
    println!("Hash:       {}", describe_mode(&config.hash));
    println!("Difficulty: {} hex zeros", config.difficulty);
    println!("Threads:    {}", config.threads.max(1));
    println!("=====================\n");

    let start = Instant::now();
    chain.add_genesis().context("Failed to mine genesis block")?;
    println!("Block #0 (genesis)");
    print_block(&chain.blocks()[0], chain.blocks()[0].nonce);

    for i in 1..=blocks {
        let iterations = chain
            .add_block(format!("Block {}", i))
            .with_context(|| format!("Failed to mine block {}", i))?;
        println!("Block #{}", i);
        print_block(&chain.blocks()[i], iterations);
    }

    if !transactions.is_empty() {
        let iterations = chain
            .add_transactions(transactions.to_vec())
            .context("Failed to mine transaction block")?;
        let index = chain.len() - 1;
        println!("Block #{} ({} transactions)", index, transactions.len());
        print_block(&chain.blocks()[index], iterations);
    }

    println!("Mined {} blocks in {:.2}s", chain.len(), start.elapsed().as_secs_f64());
    match chain.validate() {
        Ok(()) => println!("Blockchain valid? YES"),
        Err(e) => println!("Blockchain valid? NO ({})", e),
    }

    if json {
        println!("\n{}", chain.to_json()?);
    }

    Ok(())
}

fn print_block(block: &Block, iterations: u64) {
    println!("  Prev:       {}", block.previous_hash);
    println!("  Data:       {}", block.data);
    println!("  Nonce:      {}", block.nonce);
    println!("  Iterations: {}", iterations);
    println!("  Timestamp:  {}", block.timestamp);
    println!("  Hash:       {}\n", block.hash);
}

fn cmd_avalanche(config: &SimConfig) -> anyhow::Result<()> {
    let (rule, steps) = ca_params(config);
    let report = avalanche_test(rule, steps, config.seed)?;

    println!(
        "Avalanche effect ({}, {} steps, seed {}): {:.2}% bits changed ({:.2} of 256)",
        rule,
        steps,
        config.seed,
        report.percent(),
        report.mean_bit_difference
    );
    Ok(())
}

fn cmd_distribution(config: &SimConfig) -> anyhow::Result<()> {
    let (rule, steps) = ca_params(config);
    let ones = bit_distribution_test(rule, steps)?;

    println!(
        "Bit distribution ({}, {} steps): {:.2}% ones",
        rule, steps, ones
    );
    Ok(())
}

fn cmd_survey(config: &SimConfig, rules: &[u8]) -> anyhow::Result<()> {
    let (_, steps) = ca_params(config);
    let rules: Vec<Rule> = rules.iter().copied().map(Rule::new).collect();
    let survey = rule_survey(&rules, steps, config.seed)?;

    println!("{:>6} | {:>10} | {:>8}", "rule", "avalanche", "ones");
    println!("{:-<6}-+-{:-<10}-+-{:-<8}", "", "", "");
    for row in survey {
        println!(
            "{:>6} | {:>9.2}% | {:>7.2}%",
            row.avalanche.rule.number(),
            row.avalanche.percent(),
            row.ones_percent
        );
    }
    Ok(())
}

fn cmd_merkle(transactions: &[Transaction]) -> anyhow::Result<()> {
    for tx in transactions {
        println!("{} -> {} : {}  {}", tx.sender, tx.receiver, tx.amount, tx.leaf_hash());
    }
    println!("Merkle Root: {}", transactions_root(transactions));
    Ok(())
}

fn cmd_stake(config: &SimConfig, validators: &[StakeEntry], draws: usize) -> anyhow::Result<()> {
    let table = stake_table(validators.iter().cloned())?;
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

    for draw in 1..=draws {
        let Some(validator) = select_validator(&table, &mut rng) else {
            bail!("Stake table holds no stake");
        };
        println!("Draw {}: {}", draw, validator);
    }
    Ok(())
}

fn cmd_sweep(config: &SimConfig, from: usize, to: usize) -> anyhow::Result<()> {
    if from > to {
        bail!("--from must not exceed --to");
    }
    let miner = config.miner()?;
    let timestamp = now_iso8601();

    println!("Hash: {}\n", describe_mode(&config.hash));
    for difficulty in from..=to {
        let template = Block::new(
            0,
            "0000abcd1234",
            "Transaction: Alice -> Bob : 50 coins",
            timestamp.clone(),
        );
        let start = Instant::now();
        let mined = miner
            .mine(template, difficulty)
            .with_context(|| format!("Failed to mine at difficulty {}", difficulty))?;

        println!("Difficulty:  {}", difficulty);
        println!("Nonce:       {}", mined.block.nonce);
        println!("Hash:        {}", mined.block.hash);
        println!("Zeros:       {}", algorithm::leading_zero_nibbles(&mined.block.hash));
        println!("Mining time: {:.4}s\n", start.elapsed().as_secs_f64());
    }
    Ok(())
}

fn cmd_benchmark(config: &SimConfig, count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} hashes...", count);

    let provider = config.provider()?;
    let previous = "0".repeat(algorithm::DIGEST_HEX_LEN);

    let start = Instant::now();
    for i in 0..count {
        let block = Block {
            nonce: i as u64,
            ..Block::new(1, previous.as_str(), "benchmark", "1970-01-01T00:00:00Z")
        };
        let _ = provider.hash(block.payload_string().as_bytes())?;
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Hash:         {}", describe_mode(&config.hash));
    println!("  Total hashes: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate:     {:.2} H/s", hashrate);

    println!("\nAlgorithm parameters:");
    println!("  Digest bits:  {}", algorithm::DIGEST_BITS);
    println!("  Min width:    {} cells", algorithm::MIN_WIDTH);
    println!("  Step offset:  {}", algorithm::STEP_OFFSET);

    Ok(())
}

fn cmd_demo(config: &SimConfig) -> anyhow::Result<()> {
    println!("Testing CA-Hash and blockchain integration...\n");

    println!(
        "ac_hash('hello', rule=30, steps=128) = {}\n",
        algorithm::ac_hash(b"hello", Rule::new(30), 128)?
    );

    let (rule, steps) = ca_params(config);
    let demo = SimConfig {
        hash: HashMode::Cellular { rule, steps },
        ..config.clone()
    };
    let mut chain = demo.chain()?;
    chain.add_genesis()?;
    let (block, iterations) = chain.mine_next("Block 1")?;
    println!(
        "Mined block 1 after {} iterations: {}",
        iterations, block.hash
    );
    chain.append(block)?;
    println!(
        "Blockchain valid? {}\n",
        if chain.validate_chain() { "YES" } else { "NO" }
    );

    let report = avalanche_test(rule, steps, config.seed)?;
    println!(
        "Avalanche effect ({}): {:.2}% bits changed",
        rule,
        report.percent()
    );
    println!(
        "Bit distribution ({}): {:.2}% ones",
        rule,
        bit_distribution_test(rule, steps)?
    );

    println!("\n-- End of Tests --");
    Ok(())
}
