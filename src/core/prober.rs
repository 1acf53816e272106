//! Best-effort concurrent reachability probing.

use crate::core::runlog::RunLog;
use crate::models::entry::HostCredentialEntry;
use std::collections::HashSet;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Tuning for one probe pass.
#[derive(Debug, Clone, Copy)]
pub struct ProbeConfig {
    pub port: u16,
    pub timeout: Duration,
    pub workers: usize,
}

/// Return true if `host:port` accepts a TCP connection within the timeout.
///
/// Advisory only: success does not mean the real protocol or credentials
/// will work, and failure only means the port was unreachable from this
/// machine, not necessarily from the gateway.
pub fn probe_host(host: &str, port: u16, timeout: Duration) -> bool {
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(_) => return false,
    };
    for addr in addrs {
        if TcpStream::connect_timeout(&addr, timeout).is_ok() {
            return true;
        }
    }
    false
}

/// Filter `entries` down to hosts that answered the probe.
///
/// Probes run on a bounded worker pool fed from a shared job queue; each
/// worker reports `(hostname, reachable)` into a result channel, and
/// unreachable hosts are warned about from the calling thread. The
/// returned sequence preserves original input order, not probe completion
/// order.
pub fn filter_reachable(
    entries: Vec<HostCredentialEntry>,
    cfg: &ProbeConfig,
    log: &mut RunLog,
) -> Vec<HostCredentialEntry> {
    if entries.is_empty() {
        return entries;
    }

    let workers = cfg.workers.clamp(1, entries.len());
    let (job_tx, job_rx) = mpsc::channel::<String>();
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (result_tx, result_rx) = mpsc::channel::<(String, bool)>();

    let mut reachable: HashSet<String> = HashSet::new();

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            scope.spawn(move || loop {
                let host = {
                    let queue = job_rx.lock().expect("probe queue poisoned");
                    match queue.recv() {
                        Ok(host) => host,
                        Err(_) => break,
                    }
                };
                let up = probe_host(&host, cfg.port, cfg.timeout);
                if result_tx.send((host, up)).is_err() {
                    break;
                }
            });
        }

        for entry in &entries {
            // send only fails if every worker already exited
            let _ = job_tx.send(entry.hostname.clone());
        }
        drop(job_tx);
        drop(result_tx);

        for (host, up) in result_rx.iter() {
            if up {
                reachable.insert(host);
            } else {
                log.warn(&format!("{} unreachable - excluded", host));
            }
        }
    });

    entries
        .into_iter()
        .filter(|entry| reachable.contains(&entry.hostname))
        .collect()
}
