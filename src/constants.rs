//! Centralized constants for paths, defaults, and limits.

/// Default pool root directory when nothing else resolves.
pub const DEFAULT_POOL_ROOT: &str = "/etc/poolcreds";

/// Pool configuration file name.
pub const POOL_TOML: &str = "pool.toml";

/// Run history file name.
pub const RUN_LOG: &str = "runs.log";

/// Lock file guarding aggregation runs.
pub const RUN_LOCK: &str = "run.lock";

/// Base directory holding tool-account homes.
pub const TOOL_BASE_DIR: &str = "/data/project";

/// Prefix prepended to an account name to form its system user.
pub const TOOL_USER_PREFIX: &str = "tools.";

/// Absolute path to sudo, used for account impersonation.
pub const SUDO_BIN: &str = "/usr/bin/sudo";

/// The platform CLI everything shells out to.
pub const TOOLFORGE_BIN: &str = "toolforge";

/// Default number of worker accounts in a pool.
pub const DEFAULT_WORKER_COUNT: u32 = 10;

/// Maximum size accepted for a single fetched secret (1 MiB).
pub const MAX_SECRET_SIZE: usize = 1_048_576;

/// Permission mode for the run history file.
pub const RUN_LOG_MODE: u32 = 0o600;
