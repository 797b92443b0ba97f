// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Port forwarding from a local TCP port to a pod.
//!
//! A session owns one background worker. The worker first proves the pod
//! accepts a port-forward stream, reports readiness, and then accepts local
//! connections until the session is stopped. Every accepted connection gets
//! its own stream to the pod.

use crate::constants::portforward::{BIND_ADDRESS, READY_TIMEOUT_SECS};
use crate::error::{Result, TestutilError};
use crate::types::ObjectKey;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// An open forwarding session; stops accepting connections when closed or dropped
pub struct PortForward {
    local_addr: SocketAddr,
    stop_tx: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PortForward {
    /// Open a session, waiting up to `READY_TIMEOUT_SECS` for it to become ready
    pub async fn open(client: Client, pod: &Pod, local_port: u16, pod_port: u16) -> Result<Self> {
        Self::open_with_timeout(
            client,
            pod,
            local_port,
            pod_port,
            Duration::from_secs(READY_TIMEOUT_SECS),
        )
        .await
    }

    pub async fn open_with_timeout(
        client: Client,
        pod: &Pod,
        local_port: u16,
        pod_port: u16,
        ready_timeout: Duration,
    ) -> Result<Self> {
        let key = ObjectKey::from_resource(pod);
        if key.name.is_empty() {
            return Err(TestutilError::PortForwardError(
                "pod has no name".to_string(),
            ));
        }

        let listener = TcpListener::bind((BIND_ADDRESS, local_port))
            .await
            .map_err(|e| {
                TestutilError::PortForwardError(format!(
                    "Failed to bind {}:{}: {}",
                    BIND_ADDRESS, local_port, e
                ))
            })?;
        let local_addr = listener.local_addr()?;

        debug!(
            local_addr = %local_addr,
            pod = %key,
            pod_port = %pod_port,
            "Port forward bound to local address"
        );

        let (ready_tx, ready_rx) = oneshot::channel::<()>();
        let (error_tx, error_rx) = oneshot::channel::<kube::Error>();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let pods: Api<Pod> = Api::namespaced(client, &key.namespace);
        let worker = tokio::spawn(async move {
            if let Err(e) = probe(&pods, &key.name, pod_port).await {
                let _ = error_tx.send(e);
                return;
            }
            let _ = ready_tx.send(());
            // The error channel stays open while serving so startup only sees
            // it close when the worker dies.
            let _error_tx = error_tx;
            serve(listener, pods, key.name, pod_port, stop_rx).await;
        });

        let startup = async {
            tokio::select! {
                biased;
                err = error_rx => match err {
                    Ok(e) => Err(TestutilError::PortForwardError(e.to_string())),
                    Err(_) => Err(TestutilError::PortForwardError(
                        "port-forward worker exited during startup".to_string(),
                    )),
                },
                ready = ready_rx => ready.map_err(|_| {
                    TestutilError::PortForwardError(
                        "port-forward worker exited during startup".to_string(),
                    )
                }),
            }
        };

        match tokio::time::timeout(ready_timeout, startup).await {
            Ok(Ok(())) => Ok(Self {
                local_addr,
                stop_tx: Some(stop_tx),
                worker: Some(worker),
            }),
            Ok(Err(e)) => {
                worker.abort();
                Err(e)
            }
            Err(_) => {
                worker.abort();
                Err(TestutilError::PortForwardError(
                    "port-forward did not become ready in time".to_string(),
                ))
            }
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn local_port(&self) -> u16 {
        self.local_addr.port()
    }

    /// URL for `path` on the forwarded port; a missing leading `/` is added
    pub fn url(&self, path: &str) -> String {
        let normalized_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("http://{}{}", self.local_addr, normalized_path)
    }

    /// Stop accepting new connections; established ones run to completion
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
            debug!(local_addr = %self.local_addr, "Port forward stopped");
        }
        // Detach; the worker exits on its own once it sees the stop signal.
        self.worker.take();
    }
}

impl Drop for PortForward {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn probe(pods: &Api<Pod>, name: &str, pod_port: u16) -> std::result::Result<(), kube::Error> {
    let forwarder = pods.portforward(name, &[pod_port]).await?;
    forwarder.abort();
    if let Err(e) = forwarder.join().await {
        debug!(error = %e, "Probe stream closed with error");
    }
    Ok(())
}

async fn serve(
    listener: TcpListener,
    pods: Api<Pod>,
    name: String,
    pod_port: u16,
    mut stop_rx: oneshot::Receiver<()>,
) {
    info!(pod = %name, pod_port = %pod_port, "Port forward ready");
    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => {
                debug!("Port forward shutdown requested");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((local, peer)) => {
                    debug!(peer = %peer, "Accepted connection");
                    let pods = pods.clone();
                    let name = name.clone();
                    tokio::spawn(async move {
                        if let Err(e) = tunnel(local, &pods, &name, pod_port).await {
                            warn!(error = %e, pod = %name, "Port forward connection failed");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "Failed to accept connection"),
            },
        }
    }
}

async fn tunnel(mut local: TcpStream, pods: &Api<Pod>, name: &str, pod_port: u16) -> Result<()> {
    let mut forwarder = pods.portforward(name, &[pod_port]).await?;
    let mut upstream = forwarder.take_stream(pod_port).ok_or_else(|| {
        TestutilError::PortForwardError(format!("no stream for port {}", pod_port))
    })?;

    let (sent, received) = tokio::io::copy_bidirectional(&mut local, &mut upstream).await?;
    debug!(sent, received, "Connection closed");

    drop(upstream);
    forwarder
        .join()
        .await
        .map_err(|e| TestutilError::PortForwardError(e.to_string()))
}
