// Copyright 2026 veldra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Build automation for the Veldra foundation workspace.
// Run with: cargo xtask <command>

use anyhow::{bail, Result};
use std::process::Command;
use std::time::Instant;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";

struct Task {
    name: &'static str,
    summary: &'static str,
    args: &'static [&'static str],
}

// `test` runs twice: the `parallel` feature changes which code paths the
// sync and task primitives take, so both variants must stay green.
const TASKS: &[Task] = &[
    Task {
        name: "check",
        summary: "Type-check all workspace crates",
        args: &["check", "--workspace", "--all-targets"],
    },
    Task {
        name: "test",
        summary: "Run unit, integration and doc tests (default features)",
        args: &["test", "--workspace"],
    },
    Task {
        name: "test-serial",
        summary: "Re-run veldra-core tests with the parallel backend disabled",
        args: &["test", "-p", "veldra-core", "--no-default-features"],
    },
    Task {
        name: "fmt",
        summary: "Format all code with rustfmt",
        args: &["fmt", "--all"],
    },
    Task {
        name: "clippy",
        summary: "Lint with warnings denied",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    },
    Task {
        name: "bench",
        summary: "Run criterion benchmarks",
        args: &["bench", "-p", "veldra-core"],
    },
];

fn print_help() {
    println!("{BOLD}{CYAN}veldra xtask{RESET} - workspace automation\n");
    println!("{BOLD}Usage:{RESET} cargo xtask <command>\n");
    println!("{BOLD}Commands:{RESET}");
    for task in TASKS {
        println!("  {BOLD}{:<12}{RESET} {}", task.name, task.summary);
    }
    println!("  {BOLD}{:<12}{RESET} Run check, both test variants, fmt and clippy", "ci");
}

fn run_task(task: &Task) -> bool {
    println!("\n{BOLD}{CYAN}━━━ {} ━━━{RESET}", task.summary);
    println!("{BOLD}Command:{RESET} cargo {}", task.args.join(" "));

    let started = Instant::now();
    let status = Command::new("cargo").args(task.args).status();
    let elapsed = started.elapsed().as_secs_f64();

    match status {
        Ok(status) if status.success() => {
            println!("{BOLD}{GREEN}✓ {} finished in {elapsed:.2}s{RESET}", task.name);
            true
        }
        Ok(_) => {
            println!("{BOLD}{RED}✗ {} failed after {elapsed:.2}s{RESET}", task.name);
            false
        }
        Err(e) => {
            println!("{BOLD}{RED}✗ could not launch cargo: {e}{RESET}");
            false
        }
    }
}

fn run_ci() -> Result<()> {
    let pipeline = ["check", "test", "test-serial", "fmt", "clippy"];
    let started = Instant::now();
    let mut failed = Vec::new();

    for name in pipeline {
        let task = TASKS.iter().find(|t| t.name == name).expect("known task");
        if !run_task(task) {
            failed.push(name);
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    println!("\n{BOLD}Pipeline finished in {elapsed:.2}s{RESET}");
    if failed.is_empty() {
        println!("{BOLD}{GREEN}✓ all {} tasks passed{RESET}", pipeline.len());
        Ok(())
    } else {
        println!("{BOLD}{YELLOW}⚠ failed: {}{RESET}", failed.join(", "));
        bail!("{} of {} tasks failed", failed.len(), pipeline.len());
    }
}

fn main() -> Result<()> {
    let command = match std::env::args().nth(1) {
        Some(command) => command,
        None => {
            print_help();
            return Ok(());
        }
    };

    match command.as_str() {
        "ci" => run_ci(),
        name => match TASKS.iter().find(|t| t.name == name) {
            Some(task) if run_task(task) => Ok(()),
            Some(task) => bail!("task '{}' failed", task.name),
            None => {
                print_help();
                bail!("unknown command: {name}");
            }
        },
    }
}
