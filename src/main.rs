//! Haptic Sink - Dry Run
//!
//! Replays a JSON script of effect commands through the sink manager. The
//! joysticks come from the `[[devices]]` table of the configuration and are
//! served by the mock backend, so force effects are only logged. Range
//! overrides go to an in-memory device tree unless `--host-tree` is given,
//! in which case an attached G920 really has its sysfs range rewritten.
//!
//! Usage: haptic-sink [--host-tree] <commands.json> [config.toml]

use anyhow::Context;
use haptic_sink::backend::MockHapticBackend;
use haptic_sink::config::Config;
use haptic_sink::haptic::{EffectCommand, JoystickId};
use haptic_sink::wheel::{DeviceTree, MemoryTree};
use haptic_sink::{host_tree, SinkManager};
use log::{info, warn};
use serde::Deserialize;

const USAGE: &str = "usage: haptic-sink [--host-tree] <commands.json> [config.toml]";

/// One line of a command script
#[derive(Debug, Deserialize)]
struct ScriptedCommand {
    joystick: usize,
    command: EffectCommand,
}

/// Command line options
#[derive(Debug, PartialEq, Eq)]
struct Options {
    script_path: String,
    config_path: Option<String>,
    host_tree: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Options> {
    let mut host_tree = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--host-tree" => host_tree = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown option {}\n{}", flag, USAGE),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let script_path = positional.next().context(USAGE)?;
    let config_path = positional.next();
    if positional.next().is_some() {
        anyhow::bail!("too many arguments\n{}", USAGE);
    }

    Ok(Options {
        script_path,
        config_path,
        host_tree,
    })
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args(std::env::args().skip(1))?;

    let config = match &options.config_path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path))?,
        None => Config::load_default().context("loading configs/default.toml")?,
    };

    let content = std::fs::read_to_string(&options.script_path)
        .with_context(|| format!("reading {}", options.script_path))?;
    let script: Vec<ScriptedCommand> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", options.script_path))?;

    if options.host_tree {
        warn!("Range overrides will be written to the host device tree");
        replay(&config, &script, host_tree())
    } else {
        info!("Range overrides go to an in-memory device tree");
        replay(&config, &script, MemoryTree::new())
    }
}

fn replay<T: DeviceTree>(config: &Config, script: &[ScriptedCommand], tree: T) -> anyhow::Result<()> {
    let backend = MockHapticBackend::from_devices(&config.devices);
    let mut manager = SinkManager::new(config, backend.clone(), tree);

    for device in &config.devices {
        if !manager.attach(JoystickId(device.id)) {
            warn!("'{}' has no supported haptic capability", device.name);
        }
    }

    manager.start()?;

    for entry in script {
        manager.process(JoystickId(entry.joystick), &entry.command);
    }

    manager.stop();

    println!();
    println!("Commands replayed: {}", script.len());
    println!("Activations sent:  {}", backend.activations().len());
    println!("Rumbles delivered: {}", backend.rumbles().len());

    Ok(())
}
