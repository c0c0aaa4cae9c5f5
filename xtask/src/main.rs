use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

const EXTENSION_DIR: &str = "extension";
const PKG_DIR: &str = "extension/static/pkg";
const DIST_DIR: &str = "dist/extension";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Extension background task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the background worker with wasm-pack
    Build {
        /// Optimized release build
        #[arg(short, long)]
        release: bool,
    },

    /// Build and assemble an unpacked extension under dist/
    Package,

    /// Run tests
    Test,

    /// Run clippy linter (native and wasm32)
    Clippy,

    /// Remove build output
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { release } => build(release),
        Commands::Package => package(),
        Commands::Test => test(),
        Commands::Clippy => clippy(),
        Commands::Clean => clean(),
    }
}

fn build(release: bool) -> Result<()> {
    println!("🔨 Building background worker (wasm32, no-modules)...");
    let profile = if release { "--release" } else { "--dev" };
    run_cmd(
        "wasm-pack",
        &[
            "build",
            EXTENSION_DIR,
            profile,
            "--target",
            "no-modules",
            "--out-dir",
            "static/pkg",
            "--no-typescript",
        ],
    )?;
    println!("✅ Output in {}", PKG_DIR);
    Ok(())
}

fn package() -> Result<()> {
    build(true)?;

    println!("📦 Assembling unpacked extension in {}...", DIST_DIR);
    let _ = fs::remove_dir_all(DIST_DIR);
    copy_dir(Path::new("extension/static"), Path::new(DIST_DIR))?;

    // wasm-pack drops these next to the module; the browser doesn't need them
    for stray in [".gitignore", "package.json"] {
        let _ = fs::remove_file(Path::new(DIST_DIR).join("pkg").join(stray));
    }

    println!("✅ Load {} as an unpacked extension", DIST_DIR);
    Ok(())
}

fn test() -> Result<()> {
    println!("🧪 Running all tests...");
    run_cmd("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn clippy() -> Result<()> {
    println!("🔍 Running clippy on workspace (warnings as errors)...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;

    println!("🔍 Running clippy on the wasm32 build...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "-p",
            "extension-background",
            "--target",
            "wasm32-unknown-unknown",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    Ok(())
}

fn clean() -> Result<()> {
    println!("🧹 Removing build output...");
    for dir in [PKG_DIR, "dist"] {
        if Path::new(dir).exists() {
            fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir))?;
        }
    }
    run_cmd("cargo", &["clean"])?;
    Ok(())
}

// Helper functions
fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;

    for entry in fs::read_dir(from).with_context(|| format!("Failed to read {}", from.display()))? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

fn run_cmd(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run: {} {}", program, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", program, args.join(" "));
    }

    Ok(())
}
