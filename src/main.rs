use clap::{Parser, Subcommand};
use pagepack::{config, deps, discover, engine, output, pipeline};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "pagepack")]
#[command(about = "Build orchestrator for multi-page client apps")]
#[command(long_about = "\
Build orchestrator for multi-page client apps

Your filesystem is the route table. Every page component under routes/
becomes a browser bundle, every dependency in package.json becomes a shared
library bundle, and an import map ties them together so library code is
fetched once and reused across pages.

Project structure:

  my-app/
  ├── package.json                 # dependencies → library bundles
  ├── pagepack.toml                # Build config (optional)
  └── routes/
      ├── index.jsx                # Served at /
      ├── about.jsx                # Served at /about
      └── blog/
          └── post.jsx             # Served at /blog/post

Outputs under dist/:

  lib/<name>.js                    # One minified ESM bundle per dependency
  routes/<name>.js (+ .js.map)     # One ESM bundle per route
  importmap.json                   # Browser import map
  manifest.json                    # Route table for the serving backend

Run 'pagepack gen-config' to print a documented pagepack.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root (contains package.json and the routes directory)
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full build: libraries → routes → import map → manifest
    Build,
    /// List discovered routes without building
    Discover,
    /// Validate project metadata and routes without building
    Check,
    /// Print a stock pagepack.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.project)?;
            let engine = engine::EsbuildCli::new(config.bundling.esbuild_bin.as_str());

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", output::format_build_event(&event));
                }
            });

            let result = pipeline::run(&cli.project, &cli.output, &config, &engine, Some(tx));
            printer.join().expect("printer thread panicked");

            match result? {
                pipeline::BuildOutcome::NoRoutes => {}
                pipeline::BuildOutcome::Completed(report) => {
                    output::print_report(&report);
                    println!("==> Build complete: {}", cli.output.display());
                }
            }
        }
        Command::Discover => {
            let config = config::load_config(&cli.project)?;
            let discovery = discover::discover_routes(
                &cli.project.join(&config.routes_dir),
                &config.route_extension,
            );
            for warning in &discovery.warnings {
                println!("Warning: {warning}");
            }
            output::print_routes(&discovery.routes);
        }
        Command::Check => {
            let config = config::load_config(&cli.project)?;
            println!("==> Checking {}", cli.project.display());

            let dependencies =
                deps::list_dependencies(&cli.project.join(&config.package_file))?;
            if dependencies.is_empty() {
                println!("No dependencies declared");
            } else {
                println!("Dependencies: {}", dependencies.join(", "));
            }

            let discovery = discover::discover_routes(
                &cli.project.join(&config.routes_dir),
                &config.route_extension,
            );
            for warning in &discovery.warnings {
                println!("Warning: {warning}");
            }
            output::print_routes(&discovery.routes);

            println!("==> Project is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
