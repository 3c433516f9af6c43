use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use dsd_rs::decompose::{Decomposer, DecompositionParams};
use dsd_rs::network::Xag;
use dsd_rs::signal::Signal;
use dsd_rs::truth_table::TruthTable;

#[derive(Parser, Debug)]
#[command(name = "decompose")]
#[command(about = "Decompose a truth table into an XOR-AND graph", long_about = None)]
struct Args {
    /// Truth tables in binary, highest assignment first (e.g. 11101000)
    #[arg(required = true)]
    functions: Vec<String>,

    /// Also factor out XOR
    #[arg(short, long)]
    xor: bool,

    /// Largest prime support synthesized through the NPN library
    #[arg(short = 't', long, default_value = "4")]
    threshold: usize,

    /// Report prime residuals above the threshold instead of expanding them
    #[arg(long)]
    no_shannon: bool,

    /// Print every decision of the cascade
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let functions = args
        .functions
        .iter()
        .map(|s| TruthTable::from_binary(s).ok_or_else(|| eyre!("bad truth table: {:?}", s)))
        .collect::<Result<Vec<_>, _>>()?;
    let num_vars = functions.iter().map(|f| f.num_vars()).max().unwrap_or(0);
    if let Some(f) = functions.iter().find(|f| f.num_vars() != num_vars) {
        return Err(eyre!("all functions must have {} variables, {} has {}", num_vars, f, f.num_vars()));
    }

    let params = DecompositionParams {
        with_xor: args.xor,
        shannon_threshold: args.threshold,
        allow_shannon: !args.no_shannon,
    };
    println!("params = {:?}", params);

    let time_total = std::time::Instant::now();

    let mut xag = Xag::new();
    let inputs: Vec<Signal> = (0..num_vars).map(|_| xag.add_input()).collect();
    let mut outputs = Vec::with_capacity(functions.len());
    {
        let mut dec = Decomposer::new(&mut xag, params);
        for f in functions.iter() {
            println!("----------------------------------");
            println!("f = {}", f);
            println!("support = {:?}, onset = {}", f.support(), f.count_ones());
            let out = dec.run(f, &inputs).wrap_err_with(|| format!("decomposing {}", f))?;
            println!("output = {}", out);
            println!("trace:");
            for step in dec.trace() {
                println!("- {:?}", step);
            }
            outputs.push(out);
        }
        println!("----------------------------------");
        println!("stats = {:?}", dec.stats());
        println!(
            "library: {} classes, {} hits, {} misses",
            dec.library().len(),
            dec.library().hits(),
            dec.library().misses()
        );
    }

    for &out in outputs.iter() {
        xag.add_output(out);
    }
    for (f, &out) in functions.iter().zip(outputs.iter()) {
        assert_eq!(xag.simulate_function(out), *f);
    }

    println!(
        "xag: {} inputs, {} outputs, {} gates ({} AND, {} XOR)",
        xag.num_inputs(),
        xag.num_outputs(),
        xag.num_gates(),
        xag.num_and_gates(),
        xag.num_xor_gates()
    );
    for (i, gate) in xag.gates().enumerate() {
        println!("g{} = {:?}", i, gate);
    }

    println!("total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
