//! Registry of server instances and owner of the fleet manifest.

use crate::manifest_entry::ManifestEntry;
use crate::toolchain::Toolchains;
use crate::{
    FleetSettings, InstanceLayout, ManifestFile, NewServerOptions, PortAllocator, ServerInstance,
};

use cs_core::{CoreError, Result as CoreResult, ServerRecord, ServerStateSnapshot, ServerStatus};

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::sync::Arc;

use futures::future::join_all;
use log::{error, info, warn};
use tokio::sync::{Mutex, RwLock};

pub struct FleetManager {
    settings: FleetSettings,
    toolchains: Toolchains,
    ports: PortAllocator,
    manifest: ManifestFile,
    registry: RwLock<BTreeMap<u32, Arc<ServerInstance>>>,
    /// Manifest members that could not be registered during recovery. They
    /// stay in the manifest until removed or recovered on a later start.
    unrecovered: Mutex<BTreeMap<u32, ServerRecord>>,
    /// Serializes manifest writes
    manifest_lock: Mutex<()>,
}

impl FleetManager {
    pub fn new(settings: FleetSettings, toolchains: Toolchains) -> Self {
        let ports = PortAllocator::new(settings.bedrock_default_port, settings.java_default_port);
        let manifest = ManifestFile::new(settings.manifest_path());

        Self {
            settings,
            toolchains,
            ports,
            manifest,
            registry: RwLock::new(BTreeMap::new()),
            unrecovered: Mutex::new(BTreeMap::new()),
            manifest_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &FleetSettings {
        &self.settings
    }

    pub fn ports(&self) -> &PortAllocator {
        &self.ports
    }

    /// Recover the fleet from the manifest and start every member.
    ///
    /// A member that cannot be started is logged and left Stopped. One that
    /// cannot even be registered is logged and kept as an unrecovered
    /// record, so the manifest still lists it. Only a corrupt manifest fails
    /// the whole recovery.
    pub async fn init(&self) -> CoreResult<()> {
        let Some(entries) = self.manifest.read().await? else {
            info!(
                "No manifest at {}, starting with an empty fleet",
                self.manifest.path().display()
            );
            return self.persist().await;
        };

        let mut seen = BTreeSet::new();
        let mut recovered = Vec::new();

        for value in &entries {
            let Some(entry) = ManifestEntry::decode(value) else {
                warn!("Skipping manifest entry without a numeric id: {value}");
                continue;
            };

            if !seen.insert(entry.id) {
                warn!("Skipping duplicate manifest entry for server {}", entry.id);
                continue;
            }

            let options = NewServerOptions {
                edition: entry.edition,
                port: entry.port,
                max_memory_mb: entry.max_memory_mb,
            };

            match self.register(entry.id, options).await {
                Ok(instance) => {
                    if entry.port.is_some_and(|port| port != instance.port()) {
                        warn!(
                            "Server {}: recorded port {:?} is unavailable, moved to {}",
                            entry.id,
                            entry.port,
                            instance.port()
                        );
                    }
                    recovered.push(instance);
                }
                Err(e) => {
                    error!("Server {}: recovery failed: {e}", entry.id);
                    let port = entry
                        .port
                        .unwrap_or_else(|| self.ports.default_port(entry.edition));
                    self.unrecovered.lock().await.insert(
                        entry.id,
                        ServerRecord::new(entry.id, entry.edition, port, entry.max_memory_mb),
                    );
                }
            }
        }

        join_all(recovered.iter().map(|instance| async move {
            if let Err(e) = instance.start().await {
                error!("Server {}: {e}", instance.id());
            }
        }))
        .await;

        info!("Recovered {} server(s)", recovered.len());
        self.persist().await
    }

    /// Create, register and start a new server.
    ///
    /// If the first start fails the server is unregistered again and the
    /// error is returned.
    pub async fn add_new(
        &self,
        id: u32,
        options: NewServerOptions,
    ) -> CoreResult<Arc<ServerInstance>> {
        let instance = self.register(id, options).await?;
        info!(
            "Server {id}: created ({}, port {})",
            instance.edition(),
            instance.port()
        );

        if let Err(e) = instance.start().await {
            self.unregister(id).await;
            return Err(e);
        }

        self.persist().await?;
        Ok(instance)
    }

    pub async fn get(&self, id: u32) -> CoreResult<Arc<ServerInstance>> {
        self.registry
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(id))
    }

    /// Every registered server, ordered by id.
    pub async fn get_all(&self) -> Vec<Arc<ServerInstance>> {
        self.registry.read().await.values().cloned().collect()
    }

    pub async fn snapshots(&self) -> CoreResult<Vec<ServerStateSnapshot>> {
        let mut snapshots = Vec::new();
        for instance in self.get_all().await {
            snapshots.push(instance.state().await?);
        }
        Ok(snapshots)
    }

    /// Manifest members that failed to register during recovery.
    pub async fn unrecovered(&self) -> Vec<ServerRecord> {
        self.unrecovered.lock().await.values().cloned().collect()
    }

    /// Delete a stopped server and everything under `<base>/<id>`.
    ///
    /// An unrecovered member counts as stopped.
    pub async fn remove(&self, id: u32) -> CoreResult<()> {
        {
            let mut registry = self.registry.write().await;
            let instance = registry.get(&id).cloned();
            let Some(instance) = instance else {
                drop(registry);
                return self.remove_unrecovered(id).await;
            };

            let status = instance.status();
            if status != ServerStatus::Stopped {
                return Err(CoreError::must_be_stopped(id, status));
            }

            let root = instance.layout().root();
            match tokio::fs::remove_dir_all(root).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CoreError::io(root, e)),
            }

            registry.remove(&id);
            self.ports.release(instance.port());
        }

        info!("Server {id}: removed");
        self.persist().await
    }

    /// Write the manifest from the live registry and unrecovered members.
    pub async fn persist(&self) -> CoreResult<()> {
        let _guard = self.manifest_lock.lock().await;

        let mut records: BTreeMap<u32, ServerRecord> = self
            .unrecovered
            .lock()
            .await
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        records.extend(
            self.registry
                .read()
                .await
                .values()
                .map(|instance| (instance.id(), instance.record())),
        );

        let records: Vec<ServerRecord> = records.into_values().collect();
        self.manifest.write(&records).await
    }

    /// Stop every running server.
    pub async fn shutdown(&self) {
        let instances = self.get_all().await;
        info!("Stopping {} server(s)", instances.len());

        join_all(instances.iter().map(|instance| async move {
            if let Err(e) = instance.stop().await {
                error!("Server {}: stop failed during shutdown: {e}", instance.id());
            }
        }))
        .await;
    }

    /// Reserve a port and insert the instance under one registry lock.
    ///
    /// Port probing and the first properties read block, so they run on a
    /// blocking thread while the lock is held.
    async fn register(
        &self,
        id: u32,
        options: NewServerOptions,
    ) -> CoreResult<Arc<ServerInstance>> {
        let mut registry = self.registry.write().await;
        if registry.contains_key(&id) || self.unrecovered.lock().await.contains_key(&id) {
            return Err(CoreError::already_exists(id));
        }

        let ports = self.ports.clone();
        let layout = InstanceLayout::new(
            &self.settings.base_path,
            &self.settings.version_cache,
            id,
            options.edition,
        );
        let profile = self
            .settings
            .profile(options.edition, options.max_memory_mb);
        let toolchain = self.toolchains.for_edition(options.edition);
        let root = layout.root().to_path_buf();

        let (reservation, instance) = tokio::task::spawn_blocking(move || {
            let reservation = ports.allocate(options.port, options.edition)?;
            let instance = ServerInstance::new(id, profile, layout, reservation.port(), toolchain)?;
            Ok::<_, CoreError>((reservation, instance))
        })
        .await
        .map_err(|e| CoreError::io(root, std::io::Error::other(e)))??;

        let instance = Arc::new(instance);
        registry.insert(id, Arc::clone(&instance));
        reservation.commit();

        Ok(instance)
    }

    async fn remove_unrecovered(&self, id: u32) -> CoreResult<()> {
        let Some(record) = self.unrecovered.lock().await.get(&id).cloned() else {
            return Err(CoreError::not_found(id));
        };

        let layout = InstanceLayout::new(
            &self.settings.base_path,
            &self.settings.version_cache,
            id,
            record.edition,
        );
        let root = layout.root();
        match tokio::fs::remove_dir_all(root).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CoreError::io(root, e)),
        }

        self.unrecovered.lock().await.remove(&id);
        info!("Server {id}: removed unrecovered member");
        self.persist().await
    }

    async fn unregister(&self, id: u32) {
        if let Some(instance) = self.registry.write().await.remove(&id) {
            self.ports.release(instance.port());
            warn!("Server {id}: unregistered after failed start");
        }
    }
}
