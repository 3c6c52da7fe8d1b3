/// Error code registry for the converter
///
/// Error codes are organized by category:
/// - 1000-1999: Plugin and registry errors
/// - 2000-2999: Step execution errors
/// - 3000-3999: Hook errors
/// - 4000-4999: Configuration errors
/// - 5000-5999: Cancellation errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Plugin and registry errors (1000-1999)
    pub const PLUGIN_GENERIC: u16 = 1000;
    pub const PLUGIN_NOT_FOUND: u16 = 1001;
    pub const PLUGIN_NO_CONVERT_FUNCTIONS: u16 = 1002;

    // Step execution errors (2000-2999)
    pub const STEP_GENERIC: u16 = 2000;
    pub const STEP_ALL_FUNCTIONS_FAILED: u16 = 2001;

    // Hook errors (3000-3999)
    pub const HOOK_GENERIC: u16 = 3000;
    pub const HOOK_END_CONVERT_FUNCTION: u16 = 3001;
    pub const HOOK_END_PLUGIN_CONVERT: u16 = 3002;

    // Configuration errors (4000-4999)
    pub const CONFIG_GENERIC: u16 = 4000;
    pub const CONFIG_IO_ERROR: u16 = 4001;
    pub const CONFIG_INVALID_TOML: u16 = 4002;
    pub const CONFIG_INVALID_YAML: u16 = 4003;
    pub const CONFIG_INVALID_JSON: u16 = 4004;
    pub const CONFIG_UNSUPPORTED_FORMAT: u16 = 4005;

    // Cancellation errors (5000-5999)
    pub const CANCELLED: u16 = 5000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Plugin and registry errors
        1000 => "Generic plugin error",
        1001 => "Plugin is not registered",
        1002 => "Plugin has no convert functions",

        // Step execution errors
        2000 => "Generic step error",
        2001 => "Every convert function of the plugin failed",

        // Hook errors
        3000 => "Generic hook error",
        3001 => "End-convert-function hook failed",
        3002 => "End-plugin-convert hook failed",

        // Configuration errors
        4000 => "Generic configuration error",
        4001 => "Configuration file could not be read",
        4002 => "Invalid TOML syntax in configuration",
        4003 => "Invalid YAML syntax in configuration",
        4004 => "Invalid JSON syntax in configuration",
        4005 => "Unsupported configuration file format",

        // Cancellation errors
        5000 => "Conversion was cancelled",

        _ => "Unknown error code",
    }
}
