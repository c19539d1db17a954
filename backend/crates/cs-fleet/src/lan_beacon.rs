//! "Open to LAN" style announcements for Java servers.
//!
//! Java clients list a server in their LAN tab when they receive
//! `[MOTD]<motd>[/MOTD][AD]<port>[/AD]` on the multicast group below.

use cs_core::ServerStatus;

use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use log::{debug, warn};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const MULTICAST_GROUP: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(224, 0, 2, 60), 4445);
const INTERVAL: Duration = Duration::from_millis(1500);

pub struct LanBeacon;

impl LanBeacon {
    pub fn message(motd: &str, port: u16) -> String {
        format!("[MOTD]{motd}[/MOTD][AD]{port}[/AD]")
    }

    /// Announce until `status` leaves Running.
    pub fn spawn(
        id: u32,
        motd: String,
        port: u16,
        mut status: watch::Receiver<ServerStatus>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await {
                Ok(socket) => socket,
                Err(e) => {
                    warn!("Server {id}: LAN beacon disabled, cannot bind socket: {e}");
                    return;
                }
            };

            let message = Self::message(&motd, port);
            debug!("Server {id}: LAN beacon started");

            while status.borrow_and_update().is_running() {
                if let Err(e) = socket.send_to(message.as_bytes(), MULTICAST_GROUP).await {
                    debug!("Server {id}: LAN beacon send failed: {e}");
                }

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    changed = status.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            debug!("Server {id}: LAN beacon stopped");
        })
    }
}
