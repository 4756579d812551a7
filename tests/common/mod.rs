//! Member fixtures shared by the integration tests

#![allow(dead_code)]

use referral_network::Member;

/// Build a member record; empty `code`/`sponsor` mean absent.
pub fn member(id: &str, name: &str, code: &str, sponsor: &str) -> Member {
    Member::new(id, name)
        .with_referral_code(code)
        .with_sponsor(sponsor)
}

/// John with three referrals, one of them by referral code.
pub fn john_network() -> Vec<Member> {
    vec![
        member("1", "John", "J1", ""),
        member("2", "Jane", "J2", "J1"),
        member("3", "Mike", "J3", "1"),
        member("4", "Third", "J4", "1"),
    ]
}

/// Two members sponsoring each other.
pub fn two_cycle() -> Vec<Member> {
    vec![
        Member::new("1", "One").with_sponsor("2"),
        Member::new("2", "Two").with_sponsor("1"),
    ]
}

/// Balanced binary network of `size` members sponsored by referral code.
///
/// Member `i` (1-based) is sponsored by member `i / 2`, like a binary heap.
pub fn heap_network(size: usize) -> Vec<Member> {
    (1..=size)
        .map(|i| {
            let sponsor = if i == 1 {
                String::new()
            } else {
                format!("C{}", i / 2)
            };
            member(&i.to_string(), &format!("Member {i}"), &format!("C{i}"), &sponsor)
        })
        .collect()
}
