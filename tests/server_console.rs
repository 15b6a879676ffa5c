//! Server console behaviour against a scripted endpoint.

mod common;

use std::io::Cursor;

use common::{server_console, Call};
use simplechat::console::{ConsoleExit, LoopControl, ResultKind};
use simplechat::Endpoint;

#[test]
fn test_message_is_labelled_shown_and_broadcast() {
    let (mut console, state, display) = server_console(true, &[]);

    console.handle_line("hello everyone");

    assert_eq!(display.lines(), vec!["SERVER MESSAGE: hello everyone"]);
    assert_eq!(display.output(), vec!["> SERVER MESSAGE: hello everyone"]);
    assert_eq!(
        state.borrow().calls,
        vec![Call::Broadcast("SERVER MESSAGE: hello everyone".to_string())]
    );
}

#[test]
fn test_message_is_not_trimmed() {
    let (mut console, state, _display) = server_console(false, &[]);

    console.handle_line("  spaced ");

    assert_eq!(
        state.borrow().calls,
        vec![Call::Broadcast("SERVER MESSAGE:   spaced ".to_string())]
    );
}

#[test]
fn test_start_begins_listening() {
    let (mut console, state, display) = server_console(false, &[]);

    console.handle_line("#start");

    assert!(state.borrow().listening);
    assert!(console.is_active());
    assert_eq!(state.borrow().calls, vec![Call::Listen]);
    assert_eq!(
        display.output(),
        vec!["> Server listening for connections on port 5555."]
    );
}

#[test]
fn test_start_when_listening_is_rejected() {
    let (mut console, state, display) = server_console(true, &[]);

    console.handle_line("#start");

    assert!(state.borrow().calls.is_empty());
    assert!(state.borrow().listening);
    assert_eq!(
        display.output(),
        vec!["> ERROR: Server is already listening for connections."]
    );
}

#[test]
fn test_start_failure_is_reported() {
    let (mut console, state, display) = server_console(false, &[]);
    state.borrow_mut().fail_listen = true;

    console.handle_line("#start");

    assert!(!state.borrow().listening);
    assert_eq!(
        display.output(),
        vec!["> ERROR: Could not listen for clients on port 5555."]
    );
}

#[test]
fn test_listen_on_startup() {
    let (mut console, state, display) = server_console(false, &[]);

    let result = console.listen_on_startup();

    assert_eq!(result.kind(), ResultKind::Ok);
    assert!(state.borrow().listening);
    assert_eq!(display.lines().len(), 1);
}

#[test]
fn test_stop_keeps_connections_open() {
    let (mut console, state, display) = server_console(true, &["a", "b"]);

    console.handle_line("#stop");

    assert_eq!(state.borrow().calls, vec![Call::StopListening]);
    assert_eq!(state.borrow().connections.len(), 2);
    assert!(!console.is_active());
    assert_eq!(
        display.output(),
        vec!["> Server has stopped listening for connections."]
    );
}

#[test]
fn test_close_drops_every_connection() {
    let (mut console, state, display) = server_console(true, &["a", "b"]);

    assert_eq!(console.handle_line("#close"), LoopControl::Continue);

    assert_eq!(
        state.borrow().calls,
        vec![
            Call::StopListening,
            Call::CloseConnection("a".to_string()),
            Call::CloseConnection("b".to_string()),
        ]
    );
    assert!(state.borrow().connections.is_empty());
    assert_eq!(
        display.output(),
        vec!["> Server closed. 2 client connection(s) terminated."]
    );
}

#[test]
fn test_quit_closes_everything_and_exits() {
    let (mut console, state, display) = server_console(true, &["a"]);

    assert_eq!(console.handle_line("#quit"), LoopControl::Exit);

    assert_eq!(
        state.borrow().calls,
        vec![
            Call::StopListening,
            Call::CloseConnection("a".to_string()),
            Call::Close,
        ]
    );
    assert_eq!(display.output(), vec!["> Server is closing."]);
}

#[test]
fn test_setport_while_listening_is_rejected() {
    let (mut console, state, display) = server_console(true, &[]);

    console.handle_line("#setport 6000");

    assert_eq!(console.session().port(), 5555);
    assert!(state.borrow().calls.is_empty());
    assert_eq!(
        display.output(),
        vec!["> ERROR: Close the client before changing ports."]
    );
}

#[test]
fn test_setport_after_stop() {
    let (mut console, state, display) = server_console(true, &[]);

    console.handle_line("#stop");
    console.handle_line("#setport 6000");
    console.handle_line("#getport");

    assert_eq!(console.session().port(), 6000);
    assert_eq!(console.endpoint().port(), 6000);
    assert_eq!(
        state.borrow().calls,
        vec![Call::StopListening, Call::SetPort(6000)]
    );
    assert_eq!(
        display.output(),
        vec![
            "> Server has stopped listening for connections.",
            "> Port is now 6000.",
            "> Port: 6000",
        ]
    );
}

#[test]
fn test_client_commands_are_unknown_to_server() {
    for line in ["#sethost x", "#gethost", "#login", "#logoff", "#Start"] {
        let (mut console, state, display) = server_console(false, &[]);

        console.handle_line(line);

        assert_eq!(display.output(), vec!["> Did not recognize the command"]);
        assert!(state.borrow().calls.is_empty(), "{line} touched the endpoint");
    }
}

#[test]
fn test_hash_alone_does_nothing() {
    let (mut console, state, display) = server_console(true, &[]);

    console.handle_line("#");

    assert!(display.lines().is_empty());
    assert!(state.borrow().calls.is_empty());
}

#[test]
fn test_run_until_quit() {
    let (mut console, state, _display) = server_console(false, &[]);

    let exit = console.run(Cursor::new("#start\nhi\n#quit\n#start\n"));

    assert_eq!(exit, ConsoleExit::Quit);
    assert_eq!(
        state.borrow().calls,
        vec![
            Call::Listen,
            Call::Broadcast("SERVER MESSAGE: hi".to_string()),
            Call::StopListening,
            Call::Close,
        ]
    );
}

#[test]
fn test_server_vocabulary() {
    let (console, _state, _display) = server_console(false, &[]);

    assert_eq!(
        console.commands().names(),
        vec!["close", "getport", "quit", "setport", "start", "stop"]
    );
    assert!(!console.commands().contains("sethost"));
}
