use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use askama::Template;
use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use tracing::warn;

/// Identity of the serving host, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
    pub ip: String,
}

impl HostInfo {
    pub fn new(hostname: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ip: ip.into(),
        }
    }

    /// Resolve the hostname and the address of the outbound interface.
    pub fn detect() -> Self {
        Self {
            hostname: detect_hostname(),
            ip: detect_ip().to_string(),
        }
    }
}

fn detect_hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .unwrap_or_else(|| {
            warn!("could not determine hostname");
            "localhost".to_string()
        })
}

/// Connecting a UDP socket sends nothing; it only selects the route, which
/// fixes the local address.
fn detect_ip() -> IpAddr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect(("1.1.1.1", 80))?;
        Ok(socket.local_addr()?.ip())
    };
    probe().unwrap_or_else(|e| {
        warn!(error = %e, "could not determine outbound IP address");
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    })
}

/// Endpoints advertised on the index page and in `/json`.
pub fn links() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("/", "shows server data in HTML"),
        ("/json", "shows server data in JSON"),
        ("/echo", "echos request in response"),
        ("/data", "basic key/value storage on server"),
    ])
}

/// Snapshot of server data served by `/` and `/json`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub server_hostname: String,
    #[serde(rename = "serverIP")]
    pub server_ip: String,
    pub server_datetime: DateTime<Local>,
    #[serde(rename = "_links")]
    pub links: BTreeMap<&'static str, &'static str>,
}

impl ServerInfo {
    pub fn now(host: &HostInfo) -> Self {
        Self {
            server_hostname: host.hostname.clone(),
            server_ip: host.ip.clone(),
            server_datetime: Local::now(),
            links: links(),
        }
    }

    /// View model for the index page.
    pub fn page(&self) -> IndexPage {
        IndexPage {
            datetime: format_datetime(&self.server_datetime.fixed_offset()),
            hostname: self.server_hostname.clone(),
            ip: self.server_ip.clone(),
            links: self
                .links
                .iter()
                .map(|(&href, &description)| LinkRow { href, description })
                .collect(),
        }
    }
}

pub struct LinkRow {
    pub href: &'static str,
    pub description: &'static str,
}

/// Index page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub datetime: String,
    pub hostname: String,
    pub ip: String,
    pub links: Vec<LinkRow>,
}

/// `January 2, 2006 3:04:05 pm UTC`. Zones other than UTC have no name
/// available and show their numeric offset.
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    const FORMAT: &str = "%B %-d, %Y %-I:%M:%S %P";
    if dt.offset().local_minus_utc() == 0 {
        format!("{} UTC", dt.format(FORMAT))
    } else {
        format!("{} {}", dt.format(FORMAT), dt.format("%:z"))
    }
}
