use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use hyperplane::{
    perf_utils::{print_time, TimerOnce},
    shortcut, BigUint, BlakeRNGFactory, Ciphertext, KeyGenerator, PRNGSeed,
    Protocol, ProtocolParameters,
};

#[derive(Parser)]
#[command(about = "Hyperplane classification over Paillier ciphertexts")]
struct Arguments {

    /// Number of classes (hyperplanes), at least 2.
    #[arg(short='l', default_value_t = 2)]
    classes: usize,

    /// Feature vector dimension, at least 2.
    #[arg(short='d', default_value_t = 3)]
    dims: usize,

    /// First prime. Not checked for primality.
    #[arg(short='p', default_value = "7")]
    p: BigUint,

    /// Second prime. Not checked for primality.
    #[arg(short='q', default_value = "11")]
    q: BigUint,

    /// Bit bound of blinding factor candidates.
    #[arg(short='b', default_value_t = 256, value_parser = clap::value_parser!(u64).range(1..))]
    blinding_bits: u64,

    /// Seed the random generator for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the transcript as JSON.
    #[arg(long, action=clap::ArgAction::SetTrue)]
    json: bool,

    /// Print stage timings.
    #[arg(long, action=clap::ArgAction::SetTrue)]
    timing: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short='v', action=clap::ArgAction::Count)]
    verbose: u8,

}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Arguments) -> Result<(), Box<dyn std::error::Error>> {
    let parms = ProtocolParameters::new(args.classes, args.dims)?
        .set_blinding_bound_bits(args.blinding_bits)?;

    let factory = match args.seed {
        Some(seed) => BlakeRNGFactory::from_seed(PRNGSeed::from_u64(seed)),
        None => BlakeRNGFactory::new(),
    };
    let mut rng = factory.get_rng();
    let (user, cloud) = shortcut::random_instance(&parms, &mut rng);

    let timer = TimerOnce::new();
    let keygen = KeyGenerator::new(&args.p, &args.q)?;
    let protocol = Protocol::new(parms, keygen)?;
    let keygen_time = timer.elapsed();

    let timer = TimerOnce::new();
    let transcript = protocol.run(&user, &cloud, &mut rng)?;
    let classify_time = timer.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else {
        println!("[Arguments]");
        println!("  l = classes     = {}", parms.classes());
        println!("  d = dims        = {}", parms.dims());
        println!("  n = modulus     = {}", protocol.public_key().n());
        println!("  blinding bits   = {}", parms.blinding_bound_bits());
        println!();
        println!("{} Encryption {}", "-".repeat(20), "-".repeat(20));
        println!();
        println!("Encrypted vector E(x) = [{}]", transcript.user_cipher.iter().join(", "));
        println!("Encrypted result (C1,C2,..Cl) = [{}]", transcript.combined_cipher.iter().join(", "));
        let widest = transcript.combined_cipher.iter().map(Ciphertext::bits).max().unwrap_or(0);
        println!("Widest ciphertext = {} bits", widest);
        println!();
        println!("{} Decryption {}", "-".repeat(20), "-".repeat(20));
        println!("The input x belongs to the class t = {}", transcript.class);
    }

    if args.timing {
        println!();
        print_time("keygen", 0, keygen_time, 1);
        print_time("classify", 0, classify_time, 1);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
