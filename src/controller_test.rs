use super::*;

fn create_controller(wait_for_start: bool) -> (Controller, broadcast::Receiver<ControllerEvent>) {
    let (event_tx, event_rx) = broadcast::channel(16);
    (Controller::new(event_tx, wait_for_start), event_rx)
}

#[tokio::test]
async fn test_initial_state_waiting_for_start() {
    let (controller, _rx) = create_controller(true);
    assert_eq!(controller.state().await, ControllerState::WaitingForStart);
}

#[tokio::test]
async fn test_initial_state_listening() {
    let (controller, _rx) = create_controller(false);
    assert_eq!(controller.state().await, ControllerState::Listening);
}

#[tokio::test]
async fn test_begin_listening_from_waiting() {
    let (controller, _rx) = create_controller(true);

    controller.begin_listening().await.unwrap();
    assert_eq!(controller.state().await, ControllerState::Listening);
}

#[tokio::test]
async fn test_begin_listening_when_already_listening() {
    let (controller, _rx) = create_controller(false);

    assert!(controller.begin_listening().await.is_ok());
    assert_eq!(controller.state().await, ControllerState::Listening);
}

#[tokio::test]
async fn test_begin_listening_after_stop_fails() {
    let (controller, _rx) = create_controller(true);

    controller.stop().await;
    assert!(controller.begin_listening().await.is_err());
    assert_eq!(controller.state().await, ControllerState::Stopped);
}

#[tokio::test]
async fn test_stop_cancels_token() {
    let (controller, _rx) = create_controller(false);
    let token = controller.cancel_token();
    assert!(!token.is_cancelled());

    controller.stop().await;
    assert!(token.is_cancelled());
    assert_eq!(controller.state().await, ControllerState::Stopped);
}

#[tokio::test]
async fn test_begin_listening_broadcasts_event() {
    let (controller, mut rx) = create_controller(true);

    controller.begin_listening().await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        ControllerEvent::StateChanged(ControllerState::Listening)
    );
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let (controller, mut rx) = create_controller(false);

    controller.stop().await;
    controller.stop().await;

    // Exactly one Stopped event despite two stop calls.
    assert_eq!(
        rx.try_recv().unwrap(),
        ControllerEvent::StateChanged(ControllerState::Stopped)
    );
    assert!(rx.try_recv().is_err());
}
