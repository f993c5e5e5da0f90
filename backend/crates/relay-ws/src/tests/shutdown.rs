use crate::{ShutdownCoordinator, ShutdownGuard};

use tokio::time::{Duration, timeout};

#[tokio::test]
async fn given_coordinator_when_shutdown_triggered_then_guard_wakes() {
    let coordinator = ShutdownCoordinator::new();
    let mut guard = ShutdownGuard::new(&coordinator);

    let trigger = coordinator.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.shutdown();
    });

    let result = timeout(Duration::from_millis(500), guard.wait()).await;
    assert!(result.is_ok(), "Shutdown signal should be received");
}

#[tokio::test]
async fn given_shutdown_already_triggered_when_guard_created_later_then_it_still_sees_it() {
    let coordinator = ShutdownCoordinator::new();
    coordinator.shutdown();

    let mut late_guard = coordinator.subscribe_guard();

    assert!(late_guard.is_triggered());
    let result = timeout(Duration::from_millis(50), late_guard.wait()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn given_no_shutdown_when_waiting_then_guard_keeps_waiting() {
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();

    let result = timeout(Duration::from_millis(20), guard.wait()).await;

    assert!(result.is_err());
    assert!(!coordinator.is_shutdown());
    assert!(!guard.is_triggered());
}
