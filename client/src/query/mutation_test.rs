use std::cell::Cell;

use futures::executor::block_on;
use futures::future::{self, Either};

use super::*;

#[test]
fn new_mutation_is_idle() {
    let mutation = Mutation::<u32>::new(Notifier::default());
    assert_eq!(mutation.state(), MutationState::default());
}

#[test]
fn success_records_data() {
    let mutation = Mutation::<u32>::new(Notifier::default());
    let result = block_on(mutation.run(async { Ok(7) }));

    assert_eq!(result, Ok(7));
    let state = mutation.state();
    assert_eq!(state.status, MutationStatus::Success);
    assert_eq!(state.data, Some(7));
}

#[test]
fn failure_records_error() {
    let mutation = Mutation::<u32>::new(Notifier::default());
    let result = block_on(mutation.run(async { Err(ApiError::Timeout) }));

    assert_eq!(result, Err(ApiError::Timeout));
    assert_eq!(mutation.status(), MutationStatus::Error);
    assert_eq!(mutation.state().error, Some(ApiError::Timeout));
}

#[test]
fn second_run_while_pending_is_rejected_without_polling() {
    let mutation = Mutation::<u32>::new(Notifier::default());
    let polled = Cell::new(false);

    block_on(async {
        let (release_tx, release_rx) = futures::channel::oneshot::channel::<()>();
        let first = Box::pin(mutation.run(async move {
            let _ = release_rx.await;
            Ok(1)
        }));
        // Drive the first run until it parks on the channel.
        let first = match future::select(first, future::ready(())).await {
            Either::Left(_) => panic!("first run finished early"),
            Either::Right(((), first)) => first,
        };
        assert!(mutation.is_pending());

        let second = mutation
            .run(async {
                polled.set(true);
                Ok(2)
            })
            .await;
        assert_eq!(second, Err(ApiError::Busy));

        release_tx.send(()).unwrap();
        assert_eq!(first.await, Ok(1));
    });

    assert!(!polled.get());
    assert_eq!(mutation.status(), MutationStatus::Success);
}

#[test]
fn every_transition_notifies() {
    let notifier = Notifier::default();
    let count = std::rc::Rc::new(Cell::new(0));
    let seen = count.clone();
    notifier.subscribe(move || seen.set(seen.get() + 1));

    let mutation = Mutation::<u32>::new(notifier);
    let _ = block_on(mutation.run(async { Ok(1) }));

    // Pending, then Success.
    assert_eq!(count.get(), 2);
}
