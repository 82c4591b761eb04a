// CLI entry point for Smith-Waterman local alignment

use clap::{Args, Parser, Subcommand};
use std::time::Instant;

use rustseq_sw::{
    align, align_batch, align_parallel,
    config::Settings,
    error::{handle_error_and_exit, Error, Result},
    logging::init_verbose,
    mutate,
    report::{detect_mutations, render_alignment, AlignmentStats},
    seq_io, AlignmentResult,
};

#[derive(Parser)]
#[command(name = "rustseq_sw", version)]
#[command(about = "Smith-Waterman local alignment for DNA sequences")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Align one query against one reference
    Align(AlignArgs),
    /// Align one query against many references
    Batch(BatchArgs),
    /// Walk through mutation scenarios on a known sequence
    Demo(DemoArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Align(_) => "align",
            Command::Batch(_) => "batch",
            Command::Demo(_) => "demo",
        }
    }
}

#[derive(Args, Debug)]
struct InputArgs {
    /// treat sequence arguments as FASTA/FASTQ/text file paths (.gz ok)
    #[arg(short, long, default_value = "false")]
    files: bool,

    /// accept symbols outside A/C/G/T
    #[arg(long, default_value = "false")]
    allow_any: bool,

    /// print results as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// query sequence or file path
    #[arg(short = '1', long)]
    query: String,

    /// reference sequence or file path
    #[arg(short = '2', long)]
    reference: String,

    /// fill the matrix with the wavefront-parallel aligner
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// worker threads for --parallel (0 or less = all cores, default from RUSTSEQ_WORKERS)
    #[arg(short, long, allow_negative_numbers = true)]
    workers: Option<i64>,

    /// truncate printed alignments to this many columns
    #[arg(long)]
    width: Option<usize>,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// query sequence or file path
    #[arg(short, long)]
    query: String,

    /// reference sequences or file paths
    #[arg(short, long, num_args = 1.., required_unless_present = "references_file")]
    references: Vec<String>,

    /// FASTA/FASTQ/text file with one reference per record
    #[arg(long)]
    references_file: Option<String>,

    /// alignments in flight at once (0 or less = all cores, default from RUSTSEQ_BATCH_CONCURRENCY)
    #[arg(short, long, allow_negative_numbers = true)]
    concurrency: Option<i64>,

    /// truncate printed alignments to this many columns
    #[arg(long, default_value = "60")]
    width: usize,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// seed for the mutation generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn read_input(value: &str, name: &str, input: &InputArgs) -> Result<String> {
    let seq = if input.files {
        seq_io::load_sequence(value)?
    } else {
        value.trim().to_ascii_uppercase()
    };
    check_dna(&seq, name, input)?;
    Ok(seq)
}

fn check_dna(seq: &str, name: &str, input: &InputArgs) -> Result<()> {
    if !input.allow_any && !mutate::is_valid_dna(seq) {
        return Err(Error::InvalidSequence {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn print_result(result: &AlignmentResult, width: Option<usize>) {
    print!("{}", render_alignment(result, width));
    let stats = AlignmentStats::of(result);
    println!(
        "Matches: {}  Mismatches: {}  Gaps in query: {}  Gaps in reference: {}  Length: {}",
        stats.matches, stats.mismatches, stats.query_gaps, stats.reference_gaps, stats.length
    );
}

fn run_align(args: AlignArgs, settings: Settings) -> Result<()> {
    let query = read_input(&args.query, "query", &args.input)?;
    let reference = read_input(&args.reference, "reference", &args.input)?;
    let settings = settings.with_overrides(args.workers, None);

    let start = Instant::now();
    let result = if args.parallel {
        align_parallel(query.as_bytes(), reference.as_bytes(), settings.workers)
    } else {
        align(query.as_bytes(), reference.as_bytes())
    };
    log::info!("Alignment finished in {:.2?}", start.elapsed());

    if args.input.json {
        let out = serde_json::json!({
            "result": result,
            "stats": AlignmentStats::of(&result),
            "mutations": detect_mutations(&result.aligned_query, &result.aligned_reference),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_result(&result, args.width);
        if let Some(pos) = result.max_position {
            println!("Best cell: row {}, column {}", pos.row, pos.col);
        }
    }
    Ok(())
}

fn run_batch(args: BatchArgs, settings: Settings) -> Result<()> {
    let query = read_input(&args.query, "query", &args.input)?;

    let mut references = Vec::new();
    for (i, r) in args.references.iter().enumerate() {
        references.push(read_input(r, &format!("reference {}", i + 1), &args.input)?);
    }
    if let Some(path) = &args.references_file {
        for (i, r) in seq_io::load_sequences(path)?.into_iter().enumerate() {
            check_dna(&r, &format!("{} record {}", path, i + 1), &args.input)?;
            references.push(r);
        }
    }

    let settings = settings.with_overrides(None, args.concurrency);
    let start = Instant::now();
    let results: Vec<AlignmentResult> =
        align_batch(query.as_bytes(), &references, settings.batch_concurrency)
            .into_iter()
            .map(AlignmentResult::without_matrix)
            .collect();
    log::info!("Aligned against {} references in {:.2?}", results.len(), start.elapsed());

    if args.input.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("=== Reference {} ===", i + 1);
        print_result(result, Some(args.width));
        println!();
    }
    if !results.is_empty() {
        let total: i64 = results.iter().map(|r| r.max_score as i64).sum();
        println!("Average alignment score: {:.1}", total as f64 / results.len() as f64);
    }
    Ok(())
}

const DEMO_REFERENCE: &str = "GATTACAGATCAGATAGATACAGATAGACCA";

fn run_demo(args: DemoArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let rule = "-".repeat(80);

    println!("===== Single Nucleotide Polymorphism (SNP) =====");
    let query = mutate::snp(&mut rng, DEMO_REFERENCE, 15);
    println!("Original:  {}\nWith SNP:  {}\n", DEMO_REFERENCE, query);
    print_result(&align(query.as_bytes(), DEMO_REFERENCE.as_bytes()), None);
    println!("{}", rule);

    println!("===== Insertion =====");
    let query = mutate::insertion(DEMO_REFERENCE, 10, "ACT");
    println!("Inserted 'ACT' at position 10: {}\n", query);
    print_result(&align(query.as_bytes(), DEMO_REFERENCE.as_bytes()), None);
    println!("{}", rule);

    println!("===== Deletion =====");
    let query = mutate::deletion(DEMO_REFERENCE, 12, 4);
    println!("Deleted 4 bases at position 12: {}\n", query);
    print_result(&align(query.as_bytes(), DEMO_REFERENCE.as_bytes()), None);
    println!("{}", rule);

    println!("===== Multiple Mutations =====");
    let query = mutate::multiple_mutations(&mut rng, DEMO_REFERENCE, 3);
    println!("With 3 random substitutions: {}\n", query);
    print_result(&align(query.as_bytes(), DEMO_REFERENCE.as_bytes()), None);
    println!("{}", rule);

    println!("===== Combined Mutations =====");
    let query = mutate::snp(&mut rng, DEMO_REFERENCE, 5);
    let query = mutate::insertion(&query, 15, "ACGT");
    let query = mutate::deletion(&query, 20, 3);
    println!("SNP at 5, 'ACGT' inserted at 15, 3 bases deleted at 20: {}\n", query);
    let result = align(query.as_bytes(), DEMO_REFERENCE.as_bytes());
    print_result(&result, None);
    for m in detect_mutations(&result.aligned_query, &result.aligned_reference) {
        println!("  {:?} at {}: {} -> {}", m.kind, m.position, m.original, m.mutated);
    }
    println!("{}", rule);

    println!("===== Local Alignment =====");
    let pattern = "GATTACA";
    let reference = format!("XXXXXX{}YYYYYY", pattern);
    let result = align(pattern.as_bytes(), reference.as_bytes());
    print_result(&result, None);
    let stripped: String = result.aligned_reference_str().chars().filter(|&c| c != '-').collect();
    if stripped == pattern {
        println!("Local pattern found in the flanked reference");
    } else {
        log::warn!("Expected to recover {} from the flanked reference, got {}", pattern, stripped);
    }
    println!("{}", rule);

    println!("===== Consensus =====");
    let variants: Vec<String> = std::iter::once(DEMO_REFERENCE.to_string())
        .chain([3, 10, 17, 25].map(|pos| mutate::snp(&mut rng, DEMO_REFERENCE, pos)))
        .collect();
    for (i, v) in variants.iter().enumerate() {
        println!("  Variant {}: {}", i + 1, v);
    }
    let consensus = mutate::consensus(&variants);
    let differences = consensus
        .bytes()
        .zip(DEMO_REFERENCE.bytes())
        .filter(|(a, b)| a != b)
        .count();
    println!("Consensus: {}\nDifferences from original: {}", consensus, differences);
    println!("{}", rule);

    println!("===== Realistic 200 bp Case =====");
    let reference = mutate::random_sequence(&mut rng, 200);
    let query = mutate::multiple_mutations(&mut rng, &reference, 5);
    let query = mutate::insertion(&query, 75, "ACGTACGT");
    let query = mutate::deletion(&query, 120, 6);
    println!("5 SNPs, 8 bp insertion at 75, 6 bp deletion at 120\n");
    let result = align_parallel(query.as_bytes(), reference.as_bytes(), 0);
    print_result(&result, Some(50));
    Ok(())
}

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(cli.verbosity);
    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        cli.command.name()
    );

    let settings = Settings::from_env()?;
    log::debug!("Settings: {:?}", settings);

    match cli.command {
        Command::Align(args) => run_align(args, settings),
        Command::Batch(args) => run_batch(args, settings),
        Command::Demo(args) => run_demo(args),
    }
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
