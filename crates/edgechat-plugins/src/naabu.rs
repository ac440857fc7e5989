//! The `/naabu` port-scan command.
//!
//! ```text
//! /naabu -host h1[,h2,...] [-p|-port <spec>] [-tp|-top-ports 100|1000|-]
//!        [-ep|-exclude-ports <spec>] [-pts|-port-threshold <int>]
//!        [-ec|-exclude-cdn] [-cdn|-display-cdn] [-sa|-scan-all-ips]
//!        [-timeout <ms>] [-j|-json] [-h]
//! ```

use serde::Serialize;

use crate::command::{
    CommandError, CommandLimits, FlagSpec, ValueKind, Validator, parse_flags,
};
use crate::job::PluginJob;

/// Backend tool name and chat command word.
pub const TOOL: &str = "naabu";

/// Output text of a failed naabu run.
pub const FAILURE_MARKER: &str = "Naabu process exited with code 1";

/// Scan timeout applied by the backend when none is given, in ms.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Largest accepted `-timeout`, in ms.
pub const MAX_TIMEOUT_MS: u64 = 90_000;

const MAX_HOSTS: usize = 50;

/// Shown for `/naabu -h`.
pub const HELP: &str = "\
[Naabu](https://github.com/projectdiscovery/naabu) is a port scanning tool written in Go that allows you to enumerate valid ports for hosts in a fast and reliable manner. It is a really simple tool that does fast SYN/CONNECT/UDP scans on the host/list of hosts and lists all ports that return a reply.

    Usage:
       /naabu [flags]

    Flags:
    INPUT:
       -host string[]   hosts to scan ports for (comma-separated)

    PORT:
       -port, -p string             ports to scan (80,443, 100-200)
       -top-ports, -tp string       top ports to scan (default 100) [-,100,1000]
       -exclude-ports, -ep string   ports to exclude from scan (comma-separated)
       -port-threshold, -pts int    port threshold to skip port scan for the host
       -exclude-cdn, -ec            skip full port scans for CDN/WAF (only scan for port 80,443)
       -display-cdn, -cdn           display cdn in use

    CONFIGURATION:
       -scan-all-ips, -sa   scan all the IP's associated with DNS record
       -timeout int         millisecond to wait before timing out (default 10000, max 90000)

    OUTPUT:
       -j, -json   write output in JSON lines format";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NaabuFlag {
    Host,
    Port,
    TopPorts,
    ExcludePorts,
    PortThreshold,
    ExcludeCdn,
    DisplayCdn,
    ScanAllIps,
    Timeout,
    Json,
}

const FLAGS: &[FlagSpec<NaabuFlag>] = &[
    FlagSpec {
        field: NaabuFlag::Host,
        aliases: &["-host"],
        value: ValueKind::Value(Validator::HostList { max: MAX_HOSTS }),
    },
    FlagSpec {
        field: NaabuFlag::Port,
        aliases: &["-port", "-p"],
        value: ValueKind::Value(Validator::PortSpec { name: "port" }),
    },
    FlagSpec {
        field: NaabuFlag::TopPorts,
        aliases: &["-top-ports", "-tp"],
        value: ValueKind::Value(Validator::OneOf {
            name: "top-ports",
            allowed: &["100", "1000", "-"],
        }),
    },
    FlagSpec {
        field: NaabuFlag::ExcludePorts,
        aliases: &["-exclude-ports", "-ep"],
        value: ValueKind::Value(Validator::PortSpec {
            name: "exclude-ports",
        }),
    },
    FlagSpec {
        field: NaabuFlag::PortThreshold,
        aliases: &["-port-threshold", "-pts"],
        value: ValueKind::Value(Validator::Integer {
            name: "port-threshold",
            max: None,
        }),
    },
    FlagSpec {
        field: NaabuFlag::ExcludeCdn,
        aliases: &["-exclude-cdn", "-ec"],
        value: ValueKind::Switch,
    },
    FlagSpec {
        field: NaabuFlag::DisplayCdn,
        aliases: &["-display-cdn", "-cdn"],
        value: ValueKind::Switch,
    },
    FlagSpec {
        field: NaabuFlag::ScanAllIps,
        aliases: &["-scan-all-ips", "-sa"],
        value: ValueKind::Switch,
    },
    FlagSpec {
        field: NaabuFlag::Timeout,
        aliases: &["-timeout"],
        value: ValueKind::Value(Validator::Integer {
            name: "timeout",
            max: Some(MAX_TIMEOUT_MS),
        }),
    },
    FlagSpec {
        field: NaabuFlag::Json,
        aliases: &["-json", "-j"],
        value: ValueKind::Switch,
    },
];

/// Validated `/naabu` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaabuParams {
    pub hosts: Vec<String>,
    pub port: String,
    pub top_ports: String,
    pub exclude_ports: String,
    pub port_threshold: u64,
    pub exclude_cdn: bool,
    pub display_cdn: bool,
    pub scan_all_ips: bool,
    /// Milliseconds.
    pub timeout: u64,
    pub output_json: bool,
}

impl Default for NaabuParams {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            port: String::new(),
            top_ports: String::new(),
            exclude_ports: String::new(),
            port_threshold: 0,
            exclude_cdn: false,
            display_cdn: false,
            scan_all_ips: false,
            timeout: DEFAULT_TIMEOUT_MS,
            output_json: false,
        }
    }
}

/// Whether the arguments ask for help (`-h` anywhere).
pub fn wants_help(args: &str) -> bool {
    args.split_whitespace().any(|t| t == "-h")
}

/// Parse the argument text that follows `/naabu`.
pub fn parse(args: &str) -> Result<NaabuParams, CommandError> {
    let mut params = NaabuParams::default();

    for (flag, value) in parse_flags(args, FLAGS, CommandLimits::default())? {
        match flag {
            NaabuFlag::Host => params.hosts = value.into_list(),
            NaabuFlag::Port => params.port = value.into_text(),
            NaabuFlag::TopPorts => params.top_ports = value.into_text(),
            NaabuFlag::ExcludePorts => params.exclude_ports = value.into_text(),
            NaabuFlag::PortThreshold => params.port_threshold = value.as_integer(),
            NaabuFlag::Timeout => params.timeout = value.as_integer(),
            NaabuFlag::ExcludeCdn => params.exclude_cdn = true,
            NaabuFlag::DisplayCdn => params.display_cdn = true,
            NaabuFlag::ScanAllIps => params.scan_all_ips = true,
            NaabuFlag::Json => params.output_json = true,
        }
    }

    if params.hosts.is_empty() {
        return Err(CommandError::NoHost);
    }
    Ok(params)
}

impl NaabuParams {
    /// Hosts as shown to the user, comma-joined.
    pub fn target(&self) -> String {
        self.hosts.join(",")
    }

    /// Backend query pairs; values equal to their default are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> =
            self.hosts.iter().map(|h| ("host", h.clone())).collect();

        if !self.port.is_empty() {
            pairs.push(("port", self.port.clone()));
        }
        if self.timeout != DEFAULT_TIMEOUT_MS {
            pairs.push(("timeout", self.timeout.to_string()));
        }
        if self.scan_all_ips {
            pairs.push(("scanAllIPs", "true".into()));
        }
        if self.output_json {
            pairs.push(("outputJson", "true".into()));
        }
        if !self.top_ports.is_empty() {
            pairs.push(("topPorts", self.top_ports.clone()));
        }
        if !self.exclude_ports.is_empty() {
            pairs.push(("excludePorts", self.exclude_ports.clone()));
        }
        if self.port_threshold > 0 {
            pairs.push(("portThreshold", self.port_threshold.to_string()));
        }
        if self.exclude_cdn {
            pairs.push(("excludeCDN", "true".into()));
        }
        if self.display_cdn {
            pairs.push(("displayCDN", "true".into()));
        }
        pairs
    }
}

impl PluginJob for NaabuParams {
    fn tool(&self) -> &'static str {
        TOOL
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.query_pairs()
    }

    fn failure_marker(&self) -> &'static str {
        FAILURE_MARKER
    }

    fn no_results_notice(&self) -> String {
        format!("🔍 Didn't find any valid ports for {}.", self.target())
    }

    fn render_report(&self, lines: &[&str], scanned_at: &str) -> String {
        format!(
            "## [Naabu](https://github.com/projectdiscovery/naabu) Scan Results\n\
             **Target**: \"{target}\"\n\n\
             **Scan Date and Time**: {scanned_at} \n\n\
             ### Identified Ports:\n\
             ```\n{ports}\n```\n",
            target = self.target(),
            ports = lines.join("\n"),
        )
    }
}
