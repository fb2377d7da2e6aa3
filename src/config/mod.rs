mod env;
mod loader;
mod model;
mod rules;
mod validation;

pub use env::{
    Credentials, DEFAULT_ENV_FILE, Environment, MapEnvironment, ORG_VAR, ProcessEnvironment,
    TOKEN_VAR, load_env_file,
};
pub use loader::{DEFAULT_RULES_FILE, FileSystem, RealFileSystem, RuleLoader};
pub use model::{
    CommitRuleConfig, ContentKind, ContentRuleConfig, DEFAULT_API_URL, DEFAULT_COMMIT_LIMIT,
    EnvRuleConfig, ExistenceRuleConfig, ExpectedKind, MAX_COMMIT_LIMIT, MAX_WITHIN_DAYS, RuleFile,
    StructureEntryConfig, StructureRuleConfig, TargetConfig,
};
pub use rules::{
    CommitRule, ContentMatcher, ContentRule, EnvRule, ExistenceRule, ExpectedEntry, RuleSpec,
    StructureRule, Target, WorldMode,
};
pub use validation::{is_remote_url, validate_rules};
