//! Core curation extension entry points.
//!
//! # Responsibility
//! - Declare the extension manifest.
//! - Register the curation commands and the warnings hook on activation.
//!
//! # Invariants
//! - Every registration is owned by the returned `ExtensionContext`.
//! - Handlers log failures; none propagate errors back to the host.

use crate::extension::capability::RuntimeCapability;
use crate::extension::kernel::{ExtensionContext, ExtensionKernelError, ExtensionRegistry};
use crate::extension::manifest::{ExtensionManifest, HOOK_WILL_GEN_CURATION_WARNINGS};
use crate::host::ShellCommand;
use crate::service::cache::clear_cache;
use crate::service::data_pack::{load_data_pack, migrate_data_packs};
use crate::service::requirements::fix_requirements;
use crate::service::validation::append_curation_warnings;
use log::{debug, info};

pub const EXTENSION_ID: &str = "core-curation";
pub const COMMAND_FIX_REQUIREMENTS: &str = "core-curation.fix-requirements";
pub const COMMAND_MIGRATE_DATA_PACKS: &str = "core-curation.migrate-data-packs";
pub const COMMAND_CLEAR_WININET_CACHE: &str = "core-curation.clear-wininet-cache";
pub const COMMAND_LOAD_DATA_PACK: &str = "core-curation.load-data-pack";

/// Activation-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationOptions {
    /// Command run by `core-curation.clear-wininet-cache`.
    pub cache_clear_command: ShellCommand,
}

impl Default for ActivationOptions {
    fn default() -> Self {
        Self {
            cache_clear_command: ShellCommand::platform_default(),
        }
    }
}

/// Manifest of the core curation extension.
pub fn manifest() -> ExtensionManifest {
    ExtensionManifest {
        id: EXTENSION_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commands: [
            COMMAND_FIX_REQUIREMENTS,
            COMMAND_MIGRATE_DATA_PACKS,
            COMMAND_CLEAR_WININET_CACHE,
            COMMAND_LOAD_DATA_PACK,
        ]
        .iter()
        .map(|command| command.to_string())
        .collect(),
        hooks: vec![HOOK_WILL_GEN_CURATION_WARNINGS.to_string()],
        runtime_capabilities: [
            RuntimeCapability::Curation,
            RuntimeCapability::File,
            RuntimeCapability::Dialog,
            RuntimeCapability::Shell,
        ]
        .iter()
        .map(|capability| capability.as_str().to_string())
        .collect(),
    }
}

/// Activates with platform-default options.
pub fn activate(registry: &ExtensionRegistry) -> Result<ExtensionContext, ExtensionKernelError> {
    activate_with(registry, ActivationOptions::default())
}

/// Registers the manifest, all commands and the warnings hook.
pub fn activate_with(
    registry: &ExtensionRegistry,
    options: ActivationOptions,
) -> Result<ExtensionContext, ExtensionKernelError> {
    let mut context = registry.register_extension(manifest())?;

    context.subscribe(registry.register_command(
        EXTENSION_ID,
        COMMAND_FIX_REQUIREMENTS,
        &[RuntimeCapability::Curation],
        |host, args| {
            fix_requirements(host.curations, host.platforms, &args.selected);
        },
    )?);

    context.subscribe(registry.register_command(
        EXTENSION_ID,
        COMMAND_MIGRATE_DATA_PACKS,
        &[
            RuntimeCapability::Curation,
            RuntimeCapability::File,
            RuntimeCapability::Dialog,
        ],
        |host, _args| {
            migrate_data_packs(host);
        },
    )?);

    let cache_clear_command = options.cache_clear_command;
    context.subscribe(registry.register_command(
        EXTENSION_ID,
        COMMAND_CLEAR_WININET_CACHE,
        &[RuntimeCapability::Shell],
        move |host, _args| {
            clear_cache(host.shell, &cache_clear_command);
        },
    )?);

    context.subscribe(registry.register_command(
        EXTENSION_ID,
        COMMAND_LOAD_DATA_PACK,
        &[
            RuntimeCapability::Curation,
            RuntimeCapability::File,
            RuntimeCapability::Dialog,
        ],
        |host, args| match &args.curation {
            Some(curation) => {
                load_data_pack(host, curation);
            }
            None => debug!(
                "event=data_pack_load module=activation status=skipped reason=no_curation"
            ),
        },
    )?);

    context.subscribe(registry.register_will_gen_curation_warnings(
        EXTENSION_ID,
        HOOK_WILL_GEN_CURATION_WARNINGS,
        &[RuntimeCapability::Curation, RuntimeCapability::File],
        |host, event| append_curation_warnings(host, event.curation, &mut *event.warnings),
    )?);

    info!(
        "event=extension_activate module=activation status=ok extension_id={EXTENSION_ID} subscriptions={}",
        context.subscription_count()
    );
    Ok(context)
}

/// Deregisters everything `activate` registered.
pub fn deactivate(context: ExtensionContext) {
    info!(
        "event=extension_deactivate module=activation status=ok extension_id={}",
        context.extension_id()
    );
    drop(context);
}
