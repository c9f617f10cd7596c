//! Polling behavior of the HTTP provider against a scripted probe.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use connectivity_core::{Connectivity, Status};
use connectivity_http::{
    HttpConnectivity, HttpConnectivityOptions, HttpProbe, PollResult, ProbeError, ProbeRequest,
    ProbeResponse,
};
use futures_util::StreamExt;
use http::StatusCode;
use parking_lot::Mutex;
use tokio::runtime::Handle;

#[derive(Clone, Copy)]
enum Reply {
    Status(u16),
    Refused,
    Hang,
}

/// Answers each host with a fixed reply and records every request.
#[derive(Clone, Default)]
struct ScriptedProbe {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProbe {
    fn reply(mut self, host: &str, reply: Reply) -> Self {
        self.replies.insert(host.to_string(), reply);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        let host = request.url.host_str().unwrap_or_default().to_string();
        self.calls.lock().push(host.clone());

        match self.replies.get(&host).copied().unwrap_or(Reply::Refused) {
            Reply::Status(code) => Ok(ProbeResponse::new(
                request.url.clone(),
                StatusCode::from_u16(code).unwrap(),
            )),
            Reply::Refused => Err(ProbeError::Connection("connection refused".into())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

type Recorded = Arc<Mutex<Vec<PollResult>>>;

fn monitor(
    probe: ScriptedProbe,
    hosts: &[&str],
    auto_start: bool,
) -> (Connectivity, Recorded) {
    let recorded: Recorded = Arc::default();
    let sink = Arc::clone(&recorded);
    let options = HttpConnectivityOptions::builder()
        .auto_start(auto_start)
        .hosts(hosts.iter().copied())
        .polling_interval(Duration::from_secs(60))
        .on_poll_result(move |result| sink.lock().push(result))
        .build();
    let connectivity = HttpConnectivity::with_probe(options, probe, Handle::current());
    (connectivity, recorded)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_falls_back_until_a_host_answers() {
    let probe = ScriptedProbe::default()
        .reply("down.example", Reply::Refused)
        .reply("broken.example", Reply::Status(500))
        .reply("ok.example", Reply::Status(200))
        .reply("never.example", Reply::Status(200));
    let (connectivity, recorded) = monitor(
        probe.clone(),
        &["down.example", "broken.example", "ok.example", "never.example"],
        false,
    );

    let status = connectivity.status().await;
    assert_eq!(status, Status::Connected { metered: false });
    assert_eq!(probe.calls(), vec!["down.example", "broken.example", "ok.example"]);

    let recorded = recorded.lock();
    assert_eq!(recorded.len(), 3);
    assert!(matches!(
        recorded[0],
        PollResult::Error {
            error: ProbeError::Connection(_)
        }
    ));
    match &recorded[1] {
        PollResult::Response {
            response,
            is_success,
        } => {
            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!is_success);
        }
        other => panic!("expected a response, got {other:?}"),
    }
    assert!(recorded[2].is_success());
}

#[tokio::test(start_paused = true)]
async fn test_all_hosts_failing_reports_disconnected() {
    let probe = ScriptedProbe::default()
        .reply("a.example", Reply::Status(500))
        .reply("b.example", Reply::Status(404))
        .reply("c.example", Reply::Status(503));
    let (connectivity, recorded) =
        monitor(probe, &["a.example", "b.example", "c.example"], false);

    assert_eq!(connectivity.status().await, Status::Disconnected);
    assert_eq!(recorded.lock().len(), 3);
    assert!(recorded.lock().iter().all(|result| !result.is_success()));
}

#[tokio::test(start_paused = true)]
async fn test_redirect_counts_as_reachable() {
    let probe = ScriptedProbe::default().reply("moved.example", Reply::Status(301));
    let (connectivity, _) = monitor(probe, &["moved.example"], false);
    assert!(connectivity.status().await.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_host_times_out() {
    let probe = ScriptedProbe::default()
        .reply("slow.example", Reply::Hang)
        .reply("ok.example", Reply::Status(200));
    let (connectivity, recorded) = monitor(probe, &["slow.example", "ok.example"], false);

    assert!(connectivity.status().await.is_connected());
    assert_eq!(
        recorded.lock()[0],
        PollResult::Error {
            error: ProbeError::Timeout
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_polls_on_interval() {
    let probe = ScriptedProbe::default().reply("ok.example", Reply::Status(200));
    let (connectivity, _) = monitor(probe.clone(), &["ok.example"], true);
    let mut updates = connectivity.status_updates();

    settle().await;
    assert_eq!(probe.calls().len(), 1);
    assert_eq!(updates.next().await, Some(Status::Connected { metered: false }));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(probe.calls().len(), 2);
    assert_eq!(updates.next().await, Some(Status::Connected { metered: false }));
}

#[tokio::test(start_paused = true)]
async fn test_forced_check_keeps_poll_schedule() {
    let probe = ScriptedProbe::default().reply("ok.example", Reply::Status(200));
    let (connectivity, _) = monitor(probe.clone(), &["ok.example"], true);

    settle().await;
    assert_eq!(probe.calls().len(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    connectivity.status().await;
    assert_eq!(probe.calls().len(), 2);

    // The scheduled cycle still fires 60s after the first one.
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(probe.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_polling() {
    let probe = ScriptedProbe::default().reply("ok.example", Reply::Status(200));
    let (connectivity, _) = monitor(probe.clone(), &["ok.example"], true);

    settle().await;
    connectivity.stop();
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(probe.calls().len(), 1);
    assert!(!connectivity.is_monitoring());
}
