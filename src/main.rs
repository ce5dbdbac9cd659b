use anyhow::{Context, Result};
use clap::Parser;

use unitybridge::{
    handler_fn, logging, BridgeOptions, Cli, NativeBridge, UnityBridge, UnityEvent,
};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let options = cli.merge_into_options(BridgeOptions::default())?;

    logging::init(options.log_level).context("Failed to install logger")?;

    let bridge = NativeBridge::open(options.library_path.as_deref())
        .context("Failed to load Unity Bridge library")?;

    for &code in &options.listen {
        bridge.set_event_callback(
            code,
            Some(handler_fn(|event_code, data, tag| {
                log::info!(
                    "event {} tag {}: {} bytes",
                    UnityEvent::from_code(event_code),
                    tag,
                    data.len()
                );
            })),
        );
    }

    bridge.create(&options.name, options.debuggable, &options.log_path);

    if !bridge.initialize() {
        bridge.destroy();
        anyhow::bail!("Unity Bridge failed to initialize");
    }

    for &index in &options.security_key_indices {
        println!(
            "{}: {}",
            index,
            bridge.get_security_key_by_keychain_index(index)
        );
    }

    for &code in &options.listen {
        bridge.set_event_callback(code, None);
    }

    bridge.uninitialize();
    bridge.destroy();

    Ok(())
}
