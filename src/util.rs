use std::net::{IpAddr, Ipv4Addr};

const MONITOR_PORT: &str = "UPTIME_PORT";

const DEFAULT_PORT: u16 = 5000;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(MONITOR_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const MONITOR_ADDR: &str = "UPTIME_ADDR";

const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));

pub fn get_addr() -> IpAddr {
    let addr_from_env = std::env::var(MONITOR_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

/// Round a duration in seconds to two decimals, as shown in status reports
pub fn round_latency(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
