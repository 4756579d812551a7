//! Build, search, navigate and summarise a small referral network.

use referral_network::{
    build_tree, find, Member, Navigator, SponsorMatching, StatsCalculator,
};

fn main() -> anyhow::Result<()> {
    let members = vec![
        Member::new("1", "John").with_referral_code("J1"),
        Member::new("2", "Jane").with_referral_code("J2").with_sponsor("J1"),
        Member::new("3", "Mike").with_referral_code("J3").with_sponsor("1"),
        Member::new("4", "Third").with_referral_code("J4").with_sponsor("1"),
        Member::new("5", "Lena").with_referral_code("J5").with_sponsor("j2"),
        Member::new("6", "Omar").with_referral_code("J6").with_sponsor("2"),
    ];
    let john = &members[0];

    let tree = build_tree(john, &members);
    for visit in tree.walk() {
        println!("{}{} ({})", "  ".repeat(visit.depth), visit.node.name, visit.node.referral_code);
    }

    let calculator = StatsCalculator::new(&members, SponsorMatching::Dual);
    let stats = calculator.stats(john);
    println!(
        "John: direct={} team={} active={}",
        stats.direct_referrals, stats.team_size, stats.active_team
    );

    let jane = find(&tree, "jane")?.ok_or_else(|| anyhow::anyhow!("Jane is not placed"))?;
    let mut nav = Navigator::new(&tree);
    nav.descend(jane);
    let trail: Vec<&str> = nav.breadcrumbs().map(|node| node.name.as_str()).collect();
    println!("viewing {} via {}", nav.current().name, trail.join(" > "));
    nav.ascend();
    println!("back at {}", nav.current().name);

    Ok(())
}
