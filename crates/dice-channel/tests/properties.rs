//! property tests for monotonicity and commit-reveal fairness

use dice_channel::{final_random, resolve, Ledger, H256};
use dice_sdk::{Ed25519Verifier, Keypair, SignedBalanceProof};
use proptest::prelude::*;

proptest! {
    // only the highest successfully-registered nonce is authoritative
    #[test]
    fn highest_nonce_wins(n1 in 1u64..1000, n2 in 1u64..1000) {
        let peer1 = Keypair::from_seed([1u8; 32]);
        let peer2 = Keypair::from_seed([2u8; 32]);
        let a = peer1.account();
        let b = peer2.account();

        let mut ledger = Ledger::new(Ed25519Verifier, 5);
        let id = ledger.open_channel(a, b, 6, 6, 0).unwrap();

        let close_with = SignedBalanceProof::sign(&peer2, id, 1, 0, 1);
        ledger
            .force_close(&id, &a, close_with.balance_hash, 1, close_with.signature, 10)
            .unwrap();

        let first = SignedBalanceProof::sign(&peer1, id, n1 as u128, 0, n1);
        ledger
            .partner_commit_proof(&b, &a, first.balance_hash, n1, first.countersign(&peer2), first.signature, 11)
            .unwrap();

        let second = SignedBalanceProof::sign(&peer1, id, n2 as u128, 0, n2);
        let outcome = ledger.partner_commit_proof(
            &b,
            &a,
            second.balance_hash,
            n2,
            second.countersign(&peer2),
            second.signature,
            12,
        );
        prop_assert_eq!(outcome.is_ok(), n2 > n1);

        let registered = ledger.channel(&id).unwrap().peers[0].proof.unwrap().nonce;
        prop_assert_eq!(registered, n1.max(n2));
    }

    // neither party alone determines the shared randomness
    #[test]
    fn final_random_depends_on_both_secrets(
        secret_a in any::<[u8; 32]>(),
        secret_b in any::<[u8; 32]>(),
        other in any::<[u8; 32]>(),
    ) {
        let base = final_random(&H256(secret_a), &H256(secret_b));
        if other != secret_a {
            prop_assert_ne!(base, final_random(&H256(other), &H256(secret_b)));
        }
        if other != secret_b {
            prop_assert_ne!(base, final_random(&H256(secret_a), &H256(other)));
        }
    }

    // every resolvable game yields a roll inside [0, modulo)
    #[test]
    fn roll_is_always_below_modulo(bytes in any::<[u8; 32]>(), modulo in 1u8..=64) {
        let bet_mask = if modulo == 64 { u64::MAX } else { (1u64 << modulo) - 1 };
        let outcome = resolve(1, 1, bet_mask, modulo, &H256(bytes)).unwrap();
        prop_assert!(outcome.roll < modulo);
        // a full mask always wins for the initiator
        prop_assert!(outcome.initiator_wins);
    }
}
