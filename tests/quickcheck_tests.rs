use std::collections::HashSet;

use patricia_arena::Trie;
use quickcheck::quickcheck;

/// Keeps one key per bit-equivalence class. Keys that agree except for
/// trailing zero bytes are bitwise indistinguishable to the trie, so
/// later members of a class would be rejected as duplicates.
fn distinct_keys(keys: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| {
            let mut stripped = key.clone();
            while stripped.last() == Some(&0) {
                stripped.pop();
            }
            seen.insert(stripped)
        })
        .collect()
}

quickcheck! {
    fn prop_round_trip(keys: Vec<Vec<u8>>) -> bool {
        let keys = distinct_keys(keys);
        let mut trie: Trie<Vec<u8>, usize> = Trie::new();
        for (i, key) in keys.iter().enumerate() {
            if trie.insert(key.clone(), i).is_none() {
                return false;
            }
        }
        trie.len() == keys.len()
            && keys
                .iter()
                .enumerate()
                .all(|(i, key)| trie.get(&key[..]) == Some(&i))
    }

    fn prop_iteration_sorted_and_complete(keys: Vec<Vec<u8>>) -> bool {
        let keys = distinct_keys(keys);
        let mut trie: Trie<Vec<u8>, ()> = Trie::new();
        for key in &keys {
            trie.insert(key.clone(), ());
        }

        // Bit-path order over byte keys is plain lexicographic order.
        let mut expected = keys;
        expected.sort();
        let visited: Vec<Vec<u8>> = trie.iter().map(|(k, _)| k.clone()).collect();
        visited == expected
    }

    fn prop_delete_then_absent(keys: Vec<Vec<u8>>) -> bool {
        let keys = distinct_keys(keys);
        let mut trie: Trie<Vec<u8>, usize> = Trie::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key.clone(), i);
        }

        for (i, key) in keys.iter().enumerate() {
            if i % 2 != 0 {
                continue;
            }
            if trie.remove(&key[..]) != Some(i) {
                return false;
            }
            if trie.contains_key(&key[..]) || trie.remove(&key[..]).is_some() {
                return false;
            }
        }

        let survivors = keys.len() / 2;
        trie.len() == survivors
            && keys
                .iter()
                .enumerate()
                .all(|(i, key)| trie.contains_key(&key[..]) == (i % 2 == 1))
    }

    fn prop_handle_deletion_equivalent(keys: Vec<Vec<u8>>, picks: Vec<bool>) -> bool {
        let keys = distinct_keys(keys);
        let mut by_key: Trie<Vec<u8>, usize> = Trie::new();
        let mut by_handle: Trie<Vec<u8>, usize> = Trie::new();
        let mut handles = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            by_key.insert(key.clone(), i);
            match by_handle.insert(key.clone(), i) {
                Some(handle) => handles.push(handle),
                None => return false,
            }
        }

        for (i, key) in keys.iter().enumerate() {
            if picks.get(i).copied().unwrap_or(false) {
                by_key.remove(&key[..]);
                if by_handle.remove_handle(handles[i]).is_err() {
                    return false;
                }
            }
        }

        let left: Vec<(Vec<u8>, usize)> =
            by_key.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let right: Vec<(Vec<u8>, usize)> =
            by_handle.iter().map(|(k, v)| (k.clone(), *v)).collect();
        left == right
    }

    fn prop_prefix_iteration_matches_filter(keys: Vec<Vec<u8>>, prefix: Vec<u8>) -> bool {
        let keys = distinct_keys(keys);
        let mut trie: Trie<Vec<u8>, ()> = Trie::new();
        for key in &keys {
            trie.insert(key.clone(), ());
        }

        let nbits = prefix.len() as u32 * 8;
        let mut expected: Vec<Vec<u8>> = keys
            .into_iter()
            .filter(|key| {
                // Mirror the trie's bit semantics: bits past a key's
                // end read as zero.
                (0..prefix.len()).all(|i| key.get(i).copied().unwrap_or(0) == prefix[i])
            })
            .collect();
        expected.sort();

        let visited: Vec<Vec<u8>> =
            trie.iter_prefix(&prefix[..], nbits).map(|(k, _)| k.clone()).collect();
        visited == expected
    }
}
