use patricia_arena::{KeyLength, Trie};

fn string_trie(keys: &[&str]) -> Trie<String, u32> {
    let mut trie = Trie::new();
    for (i, key) in keys.iter().enumerate() {
        trie.insert(key.to_string(), i as u32);
    }
    trie
}

fn prefix_keys(trie: &Trie<String, u32>, prefix: &str, nbits: u32) -> Vec<String> {
    trie.iter_prefix(prefix, nbits).map(|(k, _)| k.clone()).collect()
}

#[test]
fn test_string_prefix_scenario() {
    let trie = string_trie(&["aa", "ab", "aac", "b"]);

    assert_eq!(prefix_keys(&trie, "a", 8), ["aa", "aac", "ab"]);
    assert_eq!(prefix_keys(&trie, "b", 8), ["b"]);
}

#[test]
fn test_string_prefix_larger_set() {
    let trie = string_trie(&["a", "aa", "ab", "aac", "aac1", "aac2", "aac3", "b", "c"]);

    let all: Vec<String> = trie.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(all, ["a", "aa", "aac", "aac1", "aac2", "aac3", "ab", "b", "c"]);

    assert_eq!(
        prefix_keys(&trie, "a", 8),
        ["a", "aa", "aac", "aac1", "aac2", "aac3", "ab"]
    );
    assert_eq!(
        prefix_keys(&trie, "aac", 24),
        ["aac", "aac1", "aac2", "aac3"]
    );
    assert_eq!(prefix_keys(&trie, "b", 8), ["b"]);
}

#[test]
fn test_prefix_with_no_matches() {
    let trie = string_trie(&["aa", "ab", "b"]);

    // The resolved node is the nearest enclosing subtree, but the
    // prefix iterator filters it down to nothing.
    assert!(trie.resolve_prefix("x", 8).is_some());
    assert_eq!(prefix_keys(&trie, "x", 8), Vec::<String>::new());
}

fn ip_trie() -> Trie<[u8; 4], &'static str> {
    let mut trie = Trie::with_key_length(KeyLength::Fixed(32));
    trie.insert([192, 168, 1, 1], "192.168.1.1");
    trie.insert([192, 168, 2, 1], "192.168.2.1");
    trie.insert([192, 168, 3, 1], "192.168.3.1");
    trie
}

fn matching_addrs(trie: &Trie<[u8; 4], &'static str>, prefix: [u8; 4], nbits: u32) -> Vec<&'static str> {
    trie.iter_prefix(&prefix, nbits).map(|(_, v)| *v).collect()
}

#[test]
fn test_ip_prefix_queries() {
    let trie = ip_trie();

    // 192.168.0.0/16 covers everything.
    assert_eq!(
        matching_addrs(&trie, [192, 168, 0, 0], 16),
        ["192.168.1.1", "192.168.2.1", "192.168.3.1"]
    );

    // 192.168.2.0/23 covers 192.168.2.x and 192.168.3.x.
    assert_eq!(
        matching_addrs(&trie, [192, 168, 2, 0], 23),
        ["192.168.2.1", "192.168.3.1"]
    );

    // 192.168.2.0/24 covers only 192.168.2.x.
    assert_eq!(matching_addrs(&trie, [192, 168, 2, 0], 24), ["192.168.2.1"]);
}

#[test]
fn test_ip_exact_lookup() {
    let trie = ip_trie();
    assert_eq!(trie.get(&[192, 168, 2, 1][..]), Some(&"192.168.2.1"));
    assert_eq!(trie.get(&[192, 168, 2, 2][..]), None);
}

#[test]
fn test_subtree_iteration_via_handle() {
    let trie = string_trie(&["hello", "help", "world"]);

    let subtree = trie.resolve_prefix("hel", 24).unwrap();
    let keys: Vec<String> = trie
        .iter_at(subtree)
        .unwrap()
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(keys, ["hello", "help"]);
}

#[test]
fn test_iteration_restartable_after_mutation_settles() {
    let mut trie = string_trie(&["aa", "ab", "aac", "b"]);
    trie.remove("ab");

    let first: Vec<String> = trie.iter().map(|(k, _)| k.clone()).collect();
    let second: Vec<String> = trie.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(first, second);
    assert_eq!(first, ["aa", "aac", "b"]);
}

#[test]
fn test_stale_subtree_handle_rejected() {
    let mut trie = string_trie(&["hello", "world"]);
    let handle = trie.insert("help".to_string(), 9).unwrap();

    trie.remove("help");
    assert!(trie.iter_at(handle).is_err());
}

#[test]
fn test_deletion_styles_match_iteration_order() {
    let keys = ["a", "aa", "ab", "aac", "b", "c"];

    let mut by_key = string_trie(&keys);
    let mut by_handle = Trie::new();
    let mut handles = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        handles.push(by_handle.insert(key.to_string(), i as u32).unwrap());
    }

    for (i, key) in keys.iter().enumerate() {
        if i % 2 == 0 {
            by_key.remove(*key);
            by_handle.remove_handle(handles[i]).unwrap();
        }
    }

    let left: Vec<(String, u32)> = by_key.iter().map(|(k, v)| (k.clone(), *v)).collect();
    let right: Vec<(String, u32)> = by_handle.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(left, right);
    assert_eq!(by_key.len(), by_handle.len());
}
