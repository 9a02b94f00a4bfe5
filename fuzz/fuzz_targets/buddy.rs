#![no_main]
use alloc_hater::AllocatorOp;
use libfuzzer_sys::fuzz_target;
use paged_buddy_hater::BuddySubject;

fuzz_target!(|ops: Vec<AllocatorOp>| {
    let subject = match BuddySubject::<8192, 16>::new() {
        Ok(s) => s,
        Err(_) => return,
    };

    let mut eval = alloc_hater::Evaluator::new(subject);
    eval.evaluate(ops).unwrap();
});
