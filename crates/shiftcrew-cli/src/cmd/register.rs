use crate::cmd::{friendly, load_config, load_service, save_sheet};
use crate::output;
use anyhow::bail;
use serde::Serialize;
use shiftcrew_core::conversation::{FlowEvent, FlowOutcome, RegistrationFlow};
use shiftcrew_core::name::Profile;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Serialize)]
struct RegisterReport {
    identifier: String,
    row: u32,
    name: String,
    display_name: String,
}

pub fn run(
    config_path: &Path,
    identifier: &str,
    last: Option<&str>,
    first: Option<&str>,
    middle: Option<&str>,
    interactive: bool,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let mut service = load_service(&cfg)?;

    let (last, first, middle) = if interactive {
        let stdin = std::io::stdin();
        let Some(profile) = collect_profile(stdin.lock(), &mut std::io::stdout())? else {
            println!("Registration cancelled.");
            return Ok(());
        };
        (profile.last, profile.first, profile.middle)
    } else {
        match (last, first) {
            (Some(l), Some(f)) => (l.to_string(), f.to_string(), middle.map(str::to_string)),
            _ => bail!("--last and --first are required (or use --interactive)"),
        }
    };

    let registration = service
        .register(identifier, &last, &first, middle.as_deref())
        .map_err(friendly)?;
    save_sheet(&cfg, &service)?;

    if json {
        output::print_json(&RegisterReport {
            identifier: identifier.trim().to_string(),
            row: registration.row,
            name: registration.profile.full_name(),
            display_name: registration.profile.compact(),
        })?;
    } else {
        println!(
            "registered: {} (row {})",
            registration.profile.full_name(),
            registration.row
        );
    }
    Ok(())
}

/// Drive the step-by-step conversation over line-oriented input.
///
/// Commands: `/skip`, `/restart`, `/cancel`, `/confirm` (or `yes`); any other
/// line is treated as a name piece. Returns `None` when the operator cancels.
fn collect_profile<R: BufRead>(input: R, out: &mut impl Write) -> anyhow::Result<Option<Profile>> {
    let (mut flow, prompt) = RegistrationFlow::start();
    writeln!(out, "{prompt}")?;

    for line in input.lines() {
        let line = line?;
        match flow.advance(parse_event(&line)) {
            FlowOutcome::Continue {
                flow: next,
                prompt,
            } => {
                writeln!(out, "{prompt}")?;
                flow = next;
            }
            FlowOutcome::Completed(profile) => return Ok(Some(profile)),
            FlowOutcome::Cancelled => return Ok(None),
        }
    }
    bail!("input ended before the name was confirmed")
}

fn parse_event(line: &str) -> FlowEvent {
    match line.trim() {
        "/skip" => FlowEvent::Skip,
        "/restart" => FlowEvent::Restart,
        "/cancel" => FlowEvent::Cancel,
        "/confirm" | "yes" => FlowEvent::Confirm,
        text => FlowEvent::Text(text.to_string()),
    }
}
