#![no_main]
use alloc_hater::AllocatorOp;
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use paged_buddy_hater::BuddySubject;

const MAX_PAGES: usize = 16;

#[derive(Clone, Debug)]
struct Args {
    page_limit: usize,
    ops: Vec<AllocatorOp>,
}

impl Arbitrary<'_> for Args {
    fn arbitrary(un: &mut Unstructured) -> arbitrary::Result<Args> {
        let page_limit = usize::arbitrary(un)? % MAX_PAGES;
        let ops = Vec::arbitrary(un)?;

        Ok(Args { page_limit, ops })
    }
}

fuzz_target!(|args: Args| {
    let Args { page_limit, ops } = args;

    // Small pages run out of metadata slots quickly.
    let subject = match BuddySubject::<512, 16>::new_with_page_limit(page_limit) {
        Ok(s) => s,
        Err(_) => return,
    };

    let mut eval = alloc_hater::Evaluator::new(subject);
    eval.evaluate(ops).unwrap();
});
