use crate::modes::{Interaction, ModeDescriptor, Reply};

/// Strategy for deriving the base prompt from the raw captured prompt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTrim {
    /// Drop the trailing delimiter character: `Router#` -> `Router`.
    TrailingDelimiter,
    /// Drop one enclosing character on each side: `<HP>` -> `HP`.
    Enclosing,
    /// Drop the delimiter, then keep the part after `@`: `user@srx>` -> `srx`.
    AfterAt,
    /// Keep the text between `(` and the first `)`: `(WLC) [md] #` -> `WLC`.
    ParenPrefix,
    /// Drop the `(`, `) ` wrapper and the delimiter: `(switch) >` -> `switch`.
    ParenWrapped,
}

/// Data-only description of a vendor platform. Selected by the dispatcher
/// and consumed by the session; carries no behaviour of its own.
#[derive(Debug)]
pub struct PlatformProfile {
    pub device_type: &'static str,
    /// Characters that may legally terminate a prompt.
    pub delimiters: &'static [char],
    /// Leading prompt characters for platforms that wrap the prompt.
    pub left_delimiters: &'static [char],
    /// Template with `{prompt}`, `{delimiters}` (and for wrapped prompts
    /// `{delimiter_left}`/`{delimiter_right}`) holes.
    pub pattern_template: &'static str,
    /// Command that disables the output pager; empty when not needed.
    pub disable_paging_command: &'static str,
    pub modes: &'static [ModeDescriptor],
    /// Name of the mode `send_config_set` enters, when the platform has one.
    pub config_mode: Option<&'static str>,
    pub commit_command: Option<&'static str>,
    pub commit_comment_template: Option<&'static str>,
    pub prompt_trim: PromptTrim,
    /// Whether connect probes the device for its prompt. Generic terminals
    /// match on delimiters alone and skip the probe.
    pub probe_prompt: bool,
    pub ansi_escape_codes: bool,
    /// Default for leaving the config mode after `send_config_set`.
    pub exit_config_default: bool,
    /// Modes entered during connect before prompt resolution.
    pub pre_resolve_modes: &'static [&'static str],
    /// Modes entered during connect after paging has been disabled.
    pub post_resolve_modes: &'static [&'static str],
    /// Appended to the username at login (RouterOS terminal options).
    pub username_suffix: &'static str,
}

const GENERIC_PATTERN: &str = r"{prompt}.*?(\(.*?\))?[{delimiters}]";
const PAREN_WRAPPED_PATTERN: &str = r"\({prompt}.*?\) (\(.*?\))?[{delimiters}]";
const ARUBA8_PATTERN: &str = r"\({prompt}.*?\) [*^]?\[.*?\] (\(.*?\))?\s?[{delimiters}]";
const COMWARE_PATTERN: &str = r"[{delimiter_left}]{prompt}[-\w]*[{delimiter_right}]";
const JUNOS_PATTERN: &str = r"\w+(@[-\w]*)?[{delimiters}]";
const ROUTEROS_PATTERN: &str = r"\[.*?\] (\/.*?)?\>";
const TERMINAL_PATTERN: &str = r"[{delimiters}]";

const ENABLE_MODE: ModeDescriptor = ModeDescriptor {
    name: "enable",
    enter_command: "enable",
    exit_command: "disable",
    check_string: "#",
    parent: None,
    enter_interactions: &[Interaction {
        expect: r"ssword",
        reply: Reply::Secret,
    }],
    exit_interactions: &[],
    error_string: None,
};

const IOS_MODES: &[ModeDescriptor] = &[
    ENABLE_MODE,
    ModeDescriptor {
        name: "config",
        enter_command: "configure terminal",
        exit_command: "end",
        check_string: ")#",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
];

const XR_MODES: &[ModeDescriptor] = &[
    ENABLE_MODE,
    ModeDescriptor {
        name: "config",
        enter_command: "configure terminal",
        exit_command: "end",
        check_string: ")#",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[Interaction {
            expect: r"Uncommitted changes found",
            reply: Reply::Literal("no"),
        }],
        error_string: None,
    },
];

const ARUBA8_MODES: &[ModeDescriptor] = &[
    ENABLE_MODE,
    ModeDescriptor {
        name: "config",
        enter_command: "configure terminal",
        exit_command: "end",
        check_string: "] (config",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
];

const FUJITSU_MODES: &[ModeDescriptor] = &[
    ENABLE_MODE,
    ModeDescriptor {
        name: "config",
        enter_command: "conf",
        exit_command: "end",
        check_string: ")#",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
];

const UBIQUITI_MODES: &[ModeDescriptor] = &[
    ENABLE_MODE,
    ModeDescriptor {
        name: "config",
        enter_command: "configure",
        exit_command: "end",
        check_string: ")#",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
];

const SYSTEM_VIEW_MODE: ModeDescriptor = ModeDescriptor {
    name: "system_view",
    enter_command: "system-view",
    exit_command: "return",
    check_string: "]",
    parent: None,
    enter_interactions: &[],
    exit_interactions: &[],
    error_string: None,
};

const COMWARE_MODES: &[ModeDescriptor] = &[SYSTEM_VIEW_MODE];

const COMWARE_LIMITED_MODES: &[ModeDescriptor] = &[
    ModeDescriptor {
        name: "cmdline",
        enter_command: "_cmdline-mode on",
        exit_command: "",
        check_string: "",
        parent: None,
        enter_interactions: &[
            Interaction {
                expect: r"\[Y/N\]",
                reply: Reply::Literal("Y"),
            },
            Interaction {
                expect: r"assword:",
                reply: Reply::Secret,
            },
        ],
        exit_interactions: &[],
        error_string: Some("Invalid password"),
    },
    SYSTEM_VIEW_MODE,
];

const JUNOS_MODES: &[ModeDescriptor] = &[
    ModeDescriptor {
        name: "cli",
        enter_command: "cli",
        exit_command: "",
        check_string: ">",
        parent: None,
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
    ModeDescriptor {
        name: "config",
        enter_command: "configure",
        exit_command: "exit",
        check_string: "#",
        parent: Some(0),
        enter_interactions: &[],
        exit_interactions: &[],
        error_string: None,
    },
];

macro_rules! ios_like {
    ($device_type:expr, paging: $paging:expr) => {
        ios_like!($device_type, paging: $paging, pattern: GENERIC_PATTERN,
                  modes: IOS_MODES, trim: PromptTrim::TrailingDelimiter)
    };
    ($device_type:expr, paging: $paging:expr, pattern: $pattern:expr,
     modes: $modes:expr, trim: $trim:expr) => {
        PlatformProfile {
            device_type: $device_type,
            delimiters: &['>', '#'],
            left_delimiters: &[],
            pattern_template: $pattern,
            disable_paging_command: $paging,
            modes: $modes,
            config_mode: Some("config"),
            commit_command: None,
            commit_comment_template: None,
            prompt_trim: $trim,
            probe_prompt: true,
            ansi_escape_codes: false,
            exit_config_default: true,
            pre_resolve_modes: &[],
            post_resolve_modes: &[],
            username_suffix: "",
        }
    };
}

const COMWARE_BASE: PlatformProfile = PlatformProfile {
    device_type: "hp_comware",
    delimiters: &['>', ']'],
    left_delimiters: &['<', '['],
    pattern_template: COMWARE_PATTERN,
    disable_paging_command: "screen-length disable",
    modes: COMWARE_MODES,
    config_mode: Some("system_view"),
    commit_command: None,
    commit_comment_template: None,
    prompt_trim: PromptTrim::Enclosing,
    probe_prompt: true,
    ansi_escape_codes: false,
    exit_config_default: false,
    pre_resolve_modes: &[],
    post_resolve_modes: &[],
    username_suffix: "",
};

pub const PLATFORMS: &[PlatformProfile] = &[
    ios_like!("arista_eos", paging: "terminal length 0"),
    ios_like!("aruba_aos_6", paging: "no paging"),
    ios_like!("aruba_aos_8", paging: "no paging", pattern: ARUBA8_PATTERN,
              modes: ARUBA8_MODES, trim: PromptTrim::ParenPrefix),
    ios_like!("cisco_asa", paging: "terminal pager 0"),
    ios_like!("cisco_ios", paging: "terminal length 0"),
    PlatformProfile {
        commit_command: Some("commit"),
        commit_comment_template: Some(r#"commit comment "{}""#),
        ..ios_like!("cisco_ios_xr", paging: "terminal length 0", pattern: GENERIC_PATTERN,
                    modes: XR_MODES, trim: PromptTrim::TrailingDelimiter)
    },
    ios_like!("cisco_nxos", paging: "terminal length 0"),
    ios_like!("fujitsu_switch", paging: "no pager", pattern: PAREN_WRAPPED_PATTERN,
              modes: FUJITSU_MODES, trim: PromptTrim::ParenWrapped),
    COMWARE_BASE,
    PlatformProfile {
        device_type: "hp_comware_limited",
        modes: COMWARE_LIMITED_MODES,
        post_resolve_modes: &["cmdline"],
        ..COMWARE_BASE
    },
    PlatformProfile {
        device_type: "juniper_junos",
        delimiters: &['%', '>', '#'],
        left_delimiters: &[],
        pattern_template: JUNOS_PATTERN,
        disable_paging_command: "set cli screen-length 0",
        modes: JUNOS_MODES,
        config_mode: Some("config"),
        commit_command: Some("commit"),
        commit_comment_template: Some(r#"commit comment "{}""#),
        prompt_trim: PromptTrim::AfterAt,
        probe_prompt: true,
        ansi_escape_codes: false,
        exit_config_default: true,
        pre_resolve_modes: &["cli"],
        post_resolve_modes: &[],
        username_suffix: "",
    },
    PlatformProfile {
        device_type: "mikrotik_routeros",
        delimiters: &['>'],
        left_delimiters: &[],
        pattern_template: ROUTEROS_PATTERN,
        disable_paging_command: "",
        modes: &[],
        config_mode: None,
        commit_command: None,
        commit_comment_template: None,
        prompt_trim: PromptTrim::TrailingDelimiter,
        probe_prompt: true,
        ansi_escape_codes: true,
        exit_config_default: true,
        pre_resolve_modes: &[],
        post_resolve_modes: &[],
        username_suffix: "+ct",
    },
    ios_like!("ubiquity_edge", paging: "terminal length 0", pattern: PAREN_WRAPPED_PATTERN,
              modes: UBIQUITI_MODES, trim: PromptTrim::ParenWrapped),
    PlatformProfile {
        device_type: "terminal",
        delimiters: &['$', '#'],
        left_delimiters: &[],
        pattern_template: TERMINAL_PATTERN,
        disable_paging_command: "",
        modes: &[],
        config_mode: None,
        commit_command: None,
        commit_comment_template: None,
        prompt_trim: PromptTrim::TrailingDelimiter,
        probe_prompt: false,
        ansi_escape_codes: false,
        exit_config_default: true,
        pre_resolve_modes: &[],
        post_resolve_modes: &[],
        username_suffix: "",
    },
];

/// Look up a platform profile by device type key. `cisco_ios_xe` is an alias
/// for `cisco_ios`.
pub fn lookup(device_type: &str) -> Option<&'static PlatformProfile> {
    let key = match device_type {
        "cisco_ios_xe" => "cisco_ios",
        other => other,
    };
    PLATFORMS.iter().find(|p| p.device_type == key)
}

/// All supported device type keys, sorted.
pub fn supported_platforms() -> Vec<&'static str> {
    let mut platforms: Vec<&'static str> = PLATFORMS.iter().map(|p| p.device_type).collect();
    platforms.push("cisco_ios_xe");
    platforms.sort_unstable();
    platforms
}

impl PlatformProfile {
    /// Index of a mode by name within this profile's mode array.
    pub fn mode_index(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|m| m.name == name)
    }
}
