//! Fleet-wide port assignment.

use crate::PortReservation;

use cs_core::{CoreError, Edition, Result as CoreResult};

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, TcpListener, UdpSocket};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

#[derive(Debug, Default)]
pub(crate) struct PortTable {
    /// Ports owned by registered servers
    pub(crate) assigned: BTreeSet<u16>,
    /// Ports handed out but not yet committed
    pub(crate) reserved: BTreeSet<u16>,
}

impl PortTable {
    pub(crate) fn lock(table: &Mutex<PortTable>) -> MutexGuard<'_, PortTable> {
        table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_taken(&self, port: u16) -> bool {
        self.assigned.contains(&port) || self.reserved.contains(&port)
    }
}

/// Hands out ports that are neither assigned, reserved nor bound by a
/// foreign process.
#[derive(Debug, Clone)]
pub struct PortAllocator {
    table: Arc<Mutex<PortTable>>,
    bedrock_default: u16,
    java_default: u16,
}

impl PortAllocator {
    pub fn new(bedrock_default: u16, java_default: u16) -> Self {
        Self {
            table: Arc::new(Mutex::new(PortTable::default())),
            bedrock_default,
            java_default,
        }
    }

    pub fn default_port(&self, edition: Edition) -> u16 {
        match edition {
            Edition::Bedrock => self.bedrock_default,
            Edition::Java => self.java_default,
        }
    }

    /// Reserve the requested port, or the edition default, or the next free
    /// port above it.
    ///
    /// Only fails once every port up to 65535 has been tried. The table lock
    /// is not held across bind probes; a candidate is reserved first so
    /// concurrent callers skip it, and released again if the probe fails.
    /// Probing blocks, so async callers run this on a blocking thread.
    #[track_caller]
    pub fn allocate(&self, requested: Option<u16>, edition: Edition) -> CoreResult<PortReservation> {
        let start = requested
            .filter(|port| *port != 0)
            .unwrap_or_else(|| self.default_port(edition));

        let mut from = start;
        while let Some(reservation) = self.reserve_untaken(from) {
            let candidate = reservation.port();
            if Self::is_bindable(candidate) {
                return Ok(reservation);
            }

            debug!("Port {candidate} is in use by another process");
            drop(reservation);
            match candidate.checked_add(1) {
                Some(next) => from = next,
                None => break,
            }
        }

        Err(CoreError::ports_exhausted(start))
    }

    fn reserve_untaken(&self, from: u16) -> Option<PortReservation> {
        let mut table = PortTable::lock(&self.table);
        let port = (from..=u16::MAX).find(|port| !table.is_taken(*port))?;
        table.reserved.insert(port);
        Some(PortReservation::new(port, Arc::clone(&self.table)))
    }

    /// Forget a port whose server was unregistered.
    pub fn release(&self, port: u16) {
        let mut table = PortTable::lock(&self.table);
        table.assigned.remove(&port);
        table.reserved.remove(&port);
    }

    pub fn is_assigned(&self, port: u16) -> bool {
        PortTable::lock(&self.table).assigned.contains(&port)
    }

    pub fn is_reserved(&self, port: u16) -> bool {
        PortTable::lock(&self.table).reserved.contains(&port)
    }

    pub fn assigned_ports(&self) -> Vec<u16> {
        PortTable::lock(&self.table).assigned.iter().copied().collect()
    }

    /// Game traffic is UDP but the Java protocol also listens on TCP, so
    /// both must be free. The probe sockets are dropped immediately.
    pub fn is_bindable(port: u16) -> bool {
        UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
            && TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
    }
}
