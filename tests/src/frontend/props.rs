//! Property tests over arbitrary instruction streams.

use proptest::prelude::*;

use dbt_core::{dump_block, Cond, Terminal};
use dbt_frontend::a32::decode::{arm_table, decode, vfp_table};
use dbt_frontend::TranslationOptions;

use super::*;

fn add_with(cond: Cond) -> u32 {
    ((cond as u32) << 28) | 0x0081_0002
}

fn region_cond() -> impl Strategy<Value = Cond> {
    prop_oneof![Just(Cond::Eq), Just(Cond::Ne), Just(Cond::Al)]
}

/// Where a stream of non-flag-setting ADDs must end, and how many of
/// them form the conditional region.
fn expected_split(conds: &[Cond]) -> (usize, usize) {
    let first = conds[0];
    let first_non_al_from = |start: usize| {
        conds[start..]
            .iter()
            .position(|&c| c != Cond::Al)
            .map_or(conds.len(), |i| start + i)
    };

    if first == Cond::Al {
        return (first_non_al_from(0), 0);
    }
    let run = conds.iter().take_while(|&&c| c == first).count();
    if run == conds.len() {
        return (run, run);
    }
    if conds[run] != Cond::Al {
        return (run, run);
    }
    (first_non_al_from(run), run)
}

proptest! {
    #[test]
    fn at_most_one_matcher_accepts(insn in any::<u32>()) {
        let hits = arm_table()
            .iter()
            .chain(vfp_table().iter())
            .filter(|m| m.matches(insn))
            .count();
        prop_assert!(hits <= 1);

        let options = TranslationOptions::default();
        prop_assert_eq!(decode(insn, &options).is_some(), hits == 1);
    }

    #[test]
    fn condition_folding(conds in prop::collection::vec(region_cond(), 1..10)) {
        let words: Vec<u32> = conds.iter().map(|&c| add_with(c)).collect();
        let block = run(&words);
        let (end, region) = expected_split(&conds);

        prop_assert_eq!(block.end_location(), at(end as u32));
        prop_assert_eq!(block.cycle_count(), end);
        prop_assert_eq!(terminal(&block), &Terminal::link_block_fast(at(end as u32)));
        if region == 0 {
            prop_assert_eq!(block.condition(), Cond::Al);
            prop_assert!(!block.has_condition_failed_location());
        } else {
            prop_assert_eq!(block.condition(), conds[0]);
            prop_assert_eq!(block.condition_failed_location(), at(region as u32));
            prop_assert_eq!(block.condition_failed_cycle_count(), region);
        }
    }

    #[test]
    fn arbitrary_words_give_well_formed_blocks(
        words in prop::collection::vec(any::<u32>(), 1..16),
        hook in any::<bool>(),
    ) {
        let options = TranslationOptions {
            hook_hint_instructions: hook,
            ..TranslationOptions::default()
        };
        let block = run_with(&words, options);

        prop_assert!(block.has_terminal());
        prop_assert!(block.cycle_count() >= 1);
        prop_assert!(block.cycle_count() <= words.len());
        prop_assert_eq!(
            block.end_location().pc(),
            BASE + 4 * block.cycle_count() as u32
        );

        let dump = dump_block(&block);
        prop_assert!(!dump.contains("<type error"), "{}", dump);

        // Use counts match the references actually held.
        for (r, inst) in block.instructions() {
            let uses: usize = block
                .instructions()
                .map(|(_, other)| other.args().iter().filter(|a| a.inst() == Some(r)).count())
                .sum();
            let uses = uses as u32;
            prop_assert_eq!(inst.use_count(), uses);
        }
    }
}
