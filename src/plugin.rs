//! Plugin command registry: the extension point for subcommands that are
//! not part of the core set. The registry is populated once at startup from
//! a fixed builtin list; unmatched CLI subcommands are dispatched through it.

use crate::internal::error::ConcertError;

/// A plugin command: same contract as a builtin command, a descriptor plus
/// a run action over its raw argument tokens.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn about(&self) -> &str;

    fn run(&self, args: &[String]) -> Result<(), ConcertError>;
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// The registry with all statically known plugins. Currently none are
    /// shipped; downstream builds register theirs here.
    pub fn with_builtins() -> Self {
        PluginRegistry::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn find(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.name() == name)
    }

    /// Dispatch an external subcommand invocation: `argv[0]` is the command
    /// name, the rest its arguments.
    pub fn dispatch(&self, argv: &[String]) -> Result<(), ConcertError> {
        let Some(name) = argv.first() else {
            return Err(ConcertError::InvalidArgument(
                "missing command name".to_owned(),
            ));
        };
        match self.find(name) {
            Some(plugin) => plugin.run(&argv[1..]),
            None => Err(ConcertError::InvalidArgument(format!(
                "no such command: `{name}'"
            ))),
        }
    }
}
