//! Extension kernel: manifest registry and capability-scoped handler table.
//!
//! # Responsibility
//! - Register extension manifests and the commands/hooks they contribute.
//! - Gate registrations on declared runtime capabilities.
//! - Dispatch host command invocations and hook events to handlers.
//!
//! # Invariants
//! - A command id maps to at most one handler at a time.
//! - Dropping a `Disposable` removes exactly the registration it guards.
//! - No registry borrow is held while a handler runs, so handlers may
//!   register or dispose other entries.

use crate::extension::capability::RuntimeCapability;
use crate::extension::manifest::{ExtensionManifest, ManifestValidationError};
use crate::host::HostServices;
use crate::model::curation::CurationState;
use crate::model::warnings::CurationWarnings;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

/// Arguments the host passes to a command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    /// Curation currently focused in the host UI, if any.
    pub curation: Option<CurationState>,
    /// Folder ids of all selected curations.
    pub selected: Vec<String>,
}

impl CommandArgs {
    pub fn selected<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            curation: None,
            selected: folders.into_iter().map(Into::into).collect(),
        }
    }

    pub fn focused(curation: CurationState) -> Self {
        Self {
            selected: vec![curation.folder.clone()],
            curation: Some(curation),
        }
    }
}

/// Event fired before the host renders warnings for one curation.
pub struct WillGenCurationWarningsEvent<'e> {
    pub curation: &'e CurationState,
    pub warnings: &'e mut CurationWarnings,
}

type CommandHandler = Rc<dyn Fn(&HostServices<'_>, &CommandArgs)>;
type WarningsHookHandler = Rc<dyn Fn(&HostServices<'_>, &mut WillGenCurationWarningsEvent<'_>)>;

struct CommandEntry {
    extension_id: String,
    subscription: u64,
    handler: CommandHandler,
}

struct HookEntry {
    extension_id: String,
    hook_id: String,
    handler: WarningsHookHandler,
}

#[derive(Default)]
struct RegistryState {
    extensions: BTreeMap<String, ExtensionManifest>,
    commands: BTreeMap<String, CommandEntry>,
    // Keyed by subscription id so emission follows registration order.
    hooks: BTreeMap<u64, HookEntry>,
    next_subscription: u64,
}

impl RegistryState {
    fn next_subscription(&mut self) -> u64 {
        self.next_subscription += 1;
        self.next_subscription
    }

    fn manifest(&self, extension_id: &str) -> Result<&ExtensionManifest, ExtensionKernelError> {
        self.extensions
            .get(extension_id)
            .ok_or_else(|| ExtensionKernelError::UnknownExtension(extension_id.to_string()))
    }

    fn require_capabilities(
        &self,
        extension_id: &str,
        required: &[RuntimeCapability],
    ) -> Result<(), ExtensionKernelError> {
        let declared = self.manifest(extension_id)?.runtime_capability_set();
        match required.iter().find(|capability| !declared.contains(capability)) {
            Some(capability) => Err(ExtensionKernelError::CapabilityDenied {
                extension_id: extension_id.to_string(),
                capability: *capability,
            }),
            None => Ok(()),
        }
    }

    fn release(&mut self, target: &Subscription) {
        match target {
            Subscription::Extension(extension_id) => {
                self.extensions.remove(extension_id);
            }
            Subscription::Command {
                command_id,
                subscription,
            } => {
                let owned = self
                    .commands
                    .get(command_id)
                    .is_some_and(|entry| entry.subscription == *subscription);
                if owned {
                    self.commands.remove(command_id);
                }
            }
            Subscription::Hook(subscription) => {
                self.hooks.remove(subscription);
            }
        }
    }
}

enum Subscription {
    Extension(String),
    Command { command_id: String, subscription: u64 },
    Hook(u64),
}

/// Scope guard for one registration; dropping it deregisters.
#[must_use = "dropping a Disposable immediately deregisters it"]
pub struct Disposable {
    state: Weak<RefCell<RegistryState>>,
    target: Subscription,
}

impl Disposable {
    /// Deregisters now. Equivalent to dropping.
    pub fn dispose(self) {}
}

impl Drop for Disposable {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        match state.try_borrow_mut() {
            Ok(mut state) => state.release(&self.target),
            Err(_) => warn!("event=dispose module=kernel status=error reason=registry_busy"),
        };
    }
}

/// Registrations made by one activated extension.
///
/// Dropping the context deregisters every command, hook, and the manifest.
pub struct ExtensionContext {
    extension_id: String,
    subscriptions: Vec<Disposable>,
}

impl ExtensionContext {
    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn subscribe(&mut self, disposable: Disposable) {
        self.subscriptions.push(disposable);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// In-process extension registry shared between host and extensions.
///
/// Cloning yields another handle onto the same table.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one manifest after validation and opens its context.
    pub fn register_extension(
        &self,
        manifest: ExtensionManifest,
    ) -> Result<ExtensionContext, ExtensionKernelError> {
        manifest
            .validate()
            .map_err(ExtensionKernelError::InvalidManifest)?;
        let id = manifest.id.trim().to_string();

        let mut state = self.state.borrow_mut();
        if state.extensions.contains_key(id.as_str()) {
            return Err(ExtensionKernelError::DuplicateExtensionId(id));
        }
        state.extensions.insert(id.clone(), manifest);
        drop(state);

        debug!("event=extension_register module=kernel status=ok extension_id={id}");
        Ok(ExtensionContext {
            subscriptions: vec![self.disposable(Subscription::Extension(id.clone()))],
            extension_id: id,
        })
    }

    /// Registers a command handler declared in the extension manifest.
    pub fn register_command<F>(
        &self,
        extension_id: &str,
        command_id: &str,
        required: &[RuntimeCapability],
        handler: F,
    ) -> Result<Disposable, ExtensionKernelError>
    where
        F: Fn(&HostServices<'_>, &CommandArgs) + 'static,
    {
        let mut state = self.state.borrow_mut();
        if !state.manifest(extension_id)?.declares_command(command_id) {
            return Err(ExtensionKernelError::UndeclaredCommand {
                extension_id: extension_id.to_string(),
                command_id: command_id.to_string(),
            });
        }
        state.require_capabilities(extension_id, required)?;
        if state.commands.contains_key(command_id) {
            return Err(ExtensionKernelError::DuplicateCommandId(
                command_id.to_string(),
            ));
        }

        let subscription = state.next_subscription();
        state.commands.insert(
            command_id.to_string(),
            CommandEntry {
                extension_id: extension_id.to_string(),
                subscription,
                handler: Rc::new(handler),
            },
        );
        drop(state);

        debug!("event=command_register module=kernel status=ok command_id={command_id}");
        Ok(self.disposable(Subscription::Command {
            command_id: command_id.to_string(),
            subscription,
        }))
    }

    /// Subscribes a handler to the pre-warning-generation hook.
    pub fn register_will_gen_curation_warnings<F>(
        &self,
        extension_id: &str,
        hook_id: &str,
        required: &[RuntimeCapability],
        handler: F,
    ) -> Result<Disposable, ExtensionKernelError>
    where
        F: Fn(&HostServices<'_>, &mut WillGenCurationWarningsEvent<'_>) + 'static,
    {
        let mut state = self.state.borrow_mut();
        if !state.manifest(extension_id)?.declares_hook(hook_id) {
            return Err(ExtensionKernelError::UndeclaredHook {
                extension_id: extension_id.to_string(),
                hook_id: hook_id.to_string(),
            });
        }
        state.require_capabilities(extension_id, required)?;

        let subscription = state.next_subscription();
        state.hooks.insert(
            subscription,
            HookEntry {
                extension_id: extension_id.to_string(),
                hook_id: hook_id.to_string(),
                handler: Rc::new(handler),
            },
        );
        drop(state);

        debug!("event=hook_register module=kernel status=ok hook_id={hook_id}");
        Ok(self.disposable(Subscription::Hook(subscription)))
    }

    /// Fails unless `extension_id` declared `capability` in its manifest.
    pub fn assert_runtime_capability(
        &self,
        extension_id: &str,
        capability: RuntimeCapability,
    ) -> Result<(), ExtensionKernelError> {
        self.state
            .borrow()
            .require_capabilities(extension_id, &[capability])
    }

    /// Runs the handler registered for `command_id`.
    pub fn execute_command(
        &self,
        host: &HostServices<'_>,
        command_id: &str,
        args: &CommandArgs,
    ) -> Result<(), ExtensionKernelError> {
        let (extension_id, handler) = {
            let state = self.state.borrow();
            let entry = state
                .commands
                .get(command_id)
                .ok_or_else(|| ExtensionKernelError::UnknownCommand(command_id.to_string()))?;
            (entry.extension_id.clone(), Rc::clone(&entry.handler))
        };

        debug!(
            "event=command_execute module=kernel status=start command_id={command_id} extension_id={extension_id}"
        );
        handler(host, args);
        Ok(())
    }

    /// Lets every subscribed extension append warnings for `curation`.
    pub fn emit_will_gen_curation_warnings(
        &self,
        host: &HostServices<'_>,
        hook_id: &str,
        curation: &CurationState,
        warnings: &mut CurationWarnings,
    ) {
        let handlers: Vec<WarningsHookHandler> = self
            .state
            .borrow()
            .hooks
            .values()
            .filter(|entry| entry.hook_id == hook_id)
            .map(|entry| Rc::clone(&entry.handler))
            .collect();

        let mut event = WillGenCurationWarningsEvent { curation, warnings };
        for handler in handlers {
            handler(host, &mut event);
        }
    }

    /// Sorted ids of currently registered commands.
    pub fn command_ids(&self) -> Vec<String> {
        self.state.borrow().commands.keys().cloned().collect()
    }

    pub fn has_command(&self, command_id: &str) -> bool {
        self.state.borrow().commands.contains_key(command_id)
    }

    pub fn hook_count(&self, hook_id: &str) -> usize {
        self.state
            .borrow()
            .hooks
            .values()
            .filter(|entry| entry.hook_id == hook_id)
            .count()
    }

    /// Hook subscriptions owned by one extension.
    pub fn hooks_of(&self, extension_id: &str) -> Vec<String> {
        self.state
            .borrow()
            .hooks
            .values()
            .filter(|entry| entry.extension_id == extension_id)
            .map(|entry| entry.hook_id.clone())
            .collect()
    }

    pub fn manifest(&self, extension_id: &str) -> Option<ExtensionManifest> {
        self.state.borrow().extensions.get(extension_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().extensions.is_empty()
    }

    fn disposable(&self, target: Subscription) -> Disposable {
        Disposable {
            state: Rc::downgrade(&self.state),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionKernelError {
    InvalidManifest(ManifestValidationError),
    DuplicateExtensionId(String),
    UnknownExtension(String),
    UndeclaredCommand {
        extension_id: String,
        command_id: String,
    },
    UndeclaredHook {
        extension_id: String,
        hook_id: String,
    },
    DuplicateCommandId(String),
    CapabilityDenied {
        extension_id: String,
        capability: RuntimeCapability,
    },
    UnknownCommand(String),
}

impl Display for ExtensionKernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidManifest(err) => write!(f, "invalid extension manifest: {err}"),
            Self::DuplicateExtensionId(value) => {
                write!(f, "extension id already registered: {value}")
            }
            Self::UnknownExtension(value) => write!(f, "extension not registered: {value}"),
            Self::UndeclaredCommand {
                extension_id,
                command_id,
            } => write!(
                f,
                "command `{command_id}` is not declared by extension `{extension_id}`"
            ),
            Self::UndeclaredHook {
                extension_id,
                hook_id,
            } => write!(
                f,
                "hook `{hook_id}` is not declared by extension `{extension_id}`"
            ),
            Self::DuplicateCommandId(value) => write!(f, "command already registered: {value}"),
            Self::CapabilityDenied {
                extension_id,
                capability,
            } => write!(
                f,
                "extension `{extension_id}` did not declare runtime capability `{capability}`"
            ),
            Self::UnknownCommand(value) => write!(f, "command not registered: {value}"),
        }
    }
}

impl Error for ExtensionKernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidManifest(err) => Some(err),
            _ => None,
        }
    }
}
