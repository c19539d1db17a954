use crate::port_allocator::PortTable;

use std::sync::{Arc, Mutex};

/// A port held back from other allocations until it is committed to a
/// registered server. Dropping an uncommitted reservation frees the port.
#[derive(Debug)]
pub struct PortReservation {
    port: u16,
    table: Arc<Mutex<PortTable>>,
    committed: bool,
}

impl PortReservation {
    pub(crate) fn new(port: u16, table: Arc<Mutex<PortTable>>) -> Self {
        Self {
            port,
            table,
            committed: false,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Move the port from the reservation table into the assigned set.
    pub fn commit(mut self) -> u16 {
        let mut table = PortTable::lock(&self.table);
        table.reserved.remove(&self.port);
        table.assigned.insert(self.port);
        self.committed = true;
        self.port
    }
}

impl Drop for PortReservation {
    fn drop(&mut self) {
        if !self.committed {
            PortTable::lock(&self.table).reserved.remove(&self.port);
        }
    }
}
