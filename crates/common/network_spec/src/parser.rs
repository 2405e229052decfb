use std::{fs, path::Path, sync::Arc};

use anyhow::anyhow;
use tracing::info;

use crate::networks::{BeaconNetworkSpec, MAINNET, MINIMAL};

/// Resolve a preset name (``mainnet``, ``minimal``) or a path to a YAML config into a validated
/// [BeaconNetworkSpec].
pub fn beacon_network_parser(network_string: &str) -> anyhow::Result<Arc<BeaconNetworkSpec>> {
    let network_spec = match network_string {
        "mainnet" => MAINNET.clone(),
        "minimal" => MINIMAL.clone(),
        path => {
            let network_spec = read_network_spec(Path::new(path))?;
            info!("Loaded beacon network spec from {path}");
            network_spec
        }
    };
    network_spec.validate()?;
    Ok(network_spec)
}

fn read_network_spec(path: &Path) -> anyhow::Result<Arc<BeaconNetworkSpec>> {
    let contents =
        fs::read_to_string(path).map_err(|err| anyhow!("Failed to read file: {err}"))?;
    Ok(Arc::new(serde_yaml::from_str(&contents).map_err(
        |err| anyhow!("Failed to parse YAML from: {err}"),
    )?))
}
