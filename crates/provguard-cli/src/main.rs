//! CLI entry point for provguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `provguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use provguard_app::{
    EvalInput, PolicyFiles, report_exit_code, run_eval, run_validate, write_report,
};
use provguard_types::EvaluationInputs;

#[derive(Parser, Debug)]
#[command(
    name = "provguard",
    version,
    about = "Organization and repository provenance policy evaluation for build artifacts",
    after_help = "Exit codes: 0 pass or audit, 2 fail, 3 invalid, 1 usage, load or I/O error."
)]
struct Cli {
    /// Log provguard internals at debug level (overrides PROVGUARD_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Organization policy document (JSON).
    #[arg(long, env = "PROVGUARD_ORG_POLICY")]
    org: Utf8PathBuf,

    /// Repository policy document (JSON).
    #[arg(long, env = "PROVGUARD_REPO_POLICY")]
    repo: Utf8PathBuf,
}

impl PolicyArgs {
    fn files(&self) -> PolicyFiles {
        PolicyFiles::new(self.org.clone(), self.repo.clone())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one artifact against both policies.
    Eval {
        #[command(flatten)]
        policies: PolicyArgs,

        /// Source repository the artifact was built from.
        #[arg(long)]
        source_uri: String,

        /// Container image reference being admitted.
        #[arg(long)]
        image_uri: String,

        /// Identity of the build platform that produced the image.
        #[arg(long)]
        builder_id: String,

        /// Where to write the JSON report.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Ignore `mode` fields and apply baseline semantics.
        #[arg(long)]
        no_modes: bool,
    },

    /// Load and validate both policy documents without evaluating.
    Validate {
        #[command(flatten)]
        policies: PolicyArgs,
    },
}

/// Exit code for argument errors; 2 is reserved for `Fail`.
const USAGE_EXIT_CODE: i32 = 1;

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Eval {
            policies,
            source_uri,
            image_uri,
            builder_id,
            report_out,
            no_modes,
        } => cmd_eval(
            &policies.files(),
            EvaluationInputs {
                source_uri,
                image_uri,
                builder_id,
            },
            report_out,
            !no_modes,
        ),
        Commands::Validate { policies } => cmd_validate(&policies.files()),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("provguard=debug")
    } else {
        EnvFilter::try_from_env("PROVGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("provguard=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_eval(
    files: &PolicyFiles,
    inputs: EvaluationInputs,
    report_out: Option<Utf8PathBuf>,
    enforce_modes: bool,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let output = run_eval(EvalInput {
            files,
            inputs,
            enforce_modes,
        })?;

        if let Some(path) = &report_out {
            write_report(path, &output.report).context("write report json")?;
        }

        match (output.outcome(), &output.report.error) {
            (Some(outcome), _) => println!("{outcome}"),
            (None, Some(error)) => eprintln!("provguard error: {error}"),
            (None, None) => {}
        }

        Ok(report_exit_code(&output.report))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("provguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_validate(files: &PolicyFiles) -> anyhow::Result<()> {
    match run_validate(files) {
        Ok(digests) => {
            for digest in &digests {
                println!("{} {} {}", digest.role, digest.sha256, digest.path);
            }
            println!("OK");
            Ok(())
        }
        Err(err) => {
            eprintln!("provguard error: {err:#}");
            std::process::exit(1);
        }
    }
}
