//! Wire constants shared by the server, the client and the bridge.

/// The JSON-RPC protocol version carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// The well-known path serving the agent card.
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";

/// The path accepting JSON-RPC envelopes.
pub const DEFAULT_RPC_PATH: &str = "/a2a";

/// Default number of tasks returned by `tasks/list`.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Agent card version used when none is given.
pub const DEFAULT_CARD_VERSION: &str = "1.0.0";

/// Create a task and run the requested capability.
pub const METHOD_TASKS_SEND: &str = "tasks/send";

/// Fetch a task by id.
pub const METHOD_TASKS_GET: &str = "tasks/get";

/// Cancel a working task.
pub const METHOD_TASKS_CANCEL: &str = "tasks/cancel";

/// List stored tasks.
pub const METHOD_TASKS_LIST: &str = "tasks/list";

/// Return the agent card.
pub const METHOD_AGENT_CARD: &str = "agent/card";

/// Method names with built-in semantics. Extension methods may not reuse them.
pub const RESERVED_METHODS: [&str; 5] = [
    METHOD_TASKS_SEND,
    METHOD_TASKS_GET,
    METHOD_TASKS_CANCEL,
    METHOD_TASKS_LIST,
    METHOD_AGENT_CARD,
];

/// Returns `true` if `method` is one of the built-in envelope methods.
pub fn is_reserved_method(method: &str) -> bool {
    RESERVED_METHODS.contains(&method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_methods_are_recognized() {
        for method in RESERVED_METHODS {
            assert!(is_reserved_method(method));
        }
        assert!(!is_reserved_method("custom/echo"));
        assert!(!is_reserved_method("tasks/sendSubscribe"));
    }
}
