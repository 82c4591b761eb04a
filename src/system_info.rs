use serde::Serialize;
use std::process::Command;

/// Host capabilities recorded alongside benchmark results
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub cpu_cores: usize,
    pub physical_cores: usize,
    pub total_ram_gb: f64,
    pub os: String,
    pub arch: String,
}

impl SystemInfo {
    /// Detect the current host
    pub fn new() -> Self {
        SystemInfo {
            cpu_cores: num_cpus::get(),
            physical_cores: num_cpus::get_physical(),
            total_ram_gb: Self::detect_total_ram().unwrap_or(0.0),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Detect total system RAM in GB
    fn detect_total_ram() -> Option<f64> {
        // Try /proc/meminfo first
        if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
            if let Some(gb) = parse_meminfo(&content) {
                return Some(gb);
            }
        }

        // Try free command as fallback
        let output = Command::new("free").args(["-g"]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let output_str = String::from_utf8_lossy(&output.stdout);
        output_str
            .lines()
            .nth(1)?
            .split_whitespace()
            .nth(1)?
            .parse::<f64>()
            .ok()
    }

    pub fn log_info(&self) {
        log::info!(
            "Host: {} logical / {} physical cores, {:.1} GB RAM ({}-{})",
            self.cpu_cores,
            self.physical_cores,
            self.total_ram_gb,
            self.os,
            self.arch
        );
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_meminfo(content: &str) -> Option<f64> {
    let line = content.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kb: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / (1024.0 * 1024.0)) // Convert KB to GB
}

/// Global system information singleton
use once_cell::sync::Lazy;

static SYSTEM_INFO: Lazy<SystemInfo> = Lazy::new(SystemInfo::new);

/// Get system information (thread-safe singleton)
pub fn get_system_info() -> &'static SystemInfo {
    &SYSTEM_INFO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_meminfo_total() {
        let content = "MemTotal:       16777216 kB\nMemFree:         1024 kB\n";
        assert_eq!(parse_meminfo(content), Some(16.0));
        assert_eq!(parse_meminfo("MemFree: 1 kB\n"), None);
    }

    #[test]
    fn singleton_reports_cores() {
        let info = get_system_info();
        assert!(info.cpu_cores >= 1);
        assert_eq!(info.cpu_cores, get_system_info().cpu_cores);
    }
}
