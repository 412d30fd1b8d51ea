use events::{
    args, Arg, EmitterConfig, EmitterError, EventEmitter, Listener, LISTENER_REMOVED_EVENT,
    NEW_LISTENER_EVENT,
};
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn counter(count: &Rc<Cell<usize>>) -> Listener {
    let count = Rc::clone(count);
    Listener::new(move |_| count.set(count.get() + 1))
}

#[test]
fn test_adding_and_removing_listeners() {
    init_tracing();
    let emitter = EventEmitter::with_config(&EmitterConfig { max_listeners: 5 });
    let additions = Rc::new(Cell::new(0));
    let removals = Rc::new(Cell::new(0));
    let test_fn = Listener::new(|_| {});

    emitter
        .add_listener(NEW_LISTENER_EVENT, counter(&additions))
        .unwrap()
        .add_listener(LISTENER_REMOVED_EVENT, counter(&removals))
        .unwrap();

    for _ in 0..5 {
        emitter.add_listener("test", test_fn.clone()).unwrap();
    }

    assert_eq!(additions.get(), 6);
    assert_eq!(removals.get(), 0);
    assert_eq!(emitter.listener_count("test"), 5);

    for _ in 0..5 {
        emitter.remove_listener("test", &test_fn);
    }

    assert_eq!(additions.get(), 6);
    assert_eq!(removals.get(), 5);
    assert_eq!(emitter.listener_count("test"), 0);
}

#[test]
fn test_sixth_listener_rejected_at_limit_five() {
    init_tracing();
    let emitter = EventEmitter::with_max_listeners(5);
    let test_fn = Listener::new(|_| {});

    for _ in 0..5 {
        emitter.on("test", test_fn.clone()).unwrap();
    }

    match emitter.on("test", test_fn.clone()) {
        Err(EmitterError::CapacityExceeded { limit }) => assert_eq!(limit, 5),
        Ok(_) => panic!("expected the sixth listener to be rejected"),
    }
    assert_eq!(emitter.listener_count("test"), 5);
}

#[test]
fn test_meta_events_carry_name_and_handle() {
    init_tracing();
    let emitter = EventEmitter::new();
    let added = Rc::new(RefCell::new(Vec::new()));
    let removed = Rc::new(RefCell::new(Vec::new()));

    let added_in = Rc::clone(&added);
    emitter
        .on(
            NEW_LISTENER_EVENT,
            Listener::new(move |args| {
                let name = args[0].as_str().map(str::to_string);
                let handle = args[1].as_listener().cloned();
                added_in.borrow_mut().push((name, handle));
            }),
        )
        .unwrap();
    let removed_in = Rc::clone(&removed);
    emitter
        .on(
            LISTENER_REMOVED_EVENT,
            Listener::new(move |args| {
                let name = args[0].as_str().map(str::to_string);
                let handle = args[1].as_listener().cloned();
                removed_in.borrow_mut().push((name, handle));
            }),
        )
        .unwrap();

    let listener = Listener::new(|_| {});
    emitter.on("click", listener.clone()).unwrap();
    emitter.off("click", &listener);

    // the removed-listener subscription above was itself announced
    assert_eq!(added.borrow().len(), 2);
    assert_eq!(
        added.borrow()[1],
        (Some("click".to_string()), Some(listener.clone()))
    );
    assert_eq!(
        *removed.borrow(),
        vec![(Some("click".to_string()), Some(listener))]
    );
}

#[test]
fn test_emit_alias_and_args() {
    init_tracing();
    let emitter = EventEmitter::new();
    let total = Rc::new(Cell::new(0));

    let total_in = Rc::clone(&total);
    emitter
        .on(
            "sum",
            Listener::new(move |args| {
                let sum: i64 = args
                    .iter()
                    .filter_map(Arg::as_value)
                    .filter_map(serde_json::Value::as_i64)
                    .sum();
                total_in.set(sum);
            }),
        )
        .unwrap();

    assert!(emitter.emit("sum", &args![1, 2, 3]));
    assert_eq!(total.get(), 6);
    assert!(!emitter.emit("other", &args![1]));
}

#[test]
fn test_once_then_two_publishes() {
    init_tracing();
    let emitter = EventEmitter::new();
    let calls = Rc::new(Cell::new(0));

    emitter.once("ready", counter(&calls)).unwrap();

    assert!(emitter.publish("ready", &[]));
    assert_eq!(emitter.listener_count("ready"), 0);
    assert!(!emitter.publish("ready", &[]));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_clear_then_reuse() {
    init_tracing();
    let emitter = EventEmitter::with_max_listeners(1);
    emitter.on("a", Listener::new(|_| {})).unwrap();
    emitter.on(NEW_LISTENER_EVENT, Listener::new(|_| {})).unwrap();

    emitter.unsubscribe_all(None);
    assert!(emitter.event_names().is_empty());
    assert_eq!(emitter.listener_count(NEW_LISTENER_EVENT), 0);

    emitter.on("a", Listener::new(|_| {})).unwrap();
    assert_eq!(emitter.listener_count("a"), 1);
    assert_eq!(emitter.max_listeners(), 1);
}

#[test]
fn test_panicking_listener_aborts_pass_and_leaves_emitter_usable() {
    init_tracing();
    let emitter = EventEmitter::new();
    let later_calls = Rc::new(Cell::new(0));

    emitter
        .on("boom", Listener::new(|_| panic!("listener failure")))
        .unwrap()
        .on("boom", counter(&later_calls))
        .unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| emitter.publish("boom", &[])));

    assert!(result.is_err());
    assert_eq!(later_calls.get(), 0);

    emitter.on("boom", Listener::new(|_| {})).unwrap();
    assert_eq!(emitter.listener_count("boom"), 3);
    assert!(!emitter.publish("other", &[]));
}
