//! Coarse concept families used to explain momentum pairs that share no
//! exact concept tag.

use std::collections::BTreeSet;

static FAMILIES: [(&str, &[&str]); 4] = [
    ("新材料", &["新材料", "石墨烯", "复合材料", "磁材", "高分子"]),
    (
        "电子科技",
        &["电子信息", "集成电路", "光电子", "半导体", "激光", "显示技术"],
    ),
    ("高端制造", &["高端制造", "智能制造", "工业4.0", "机器人", "数字化"]),
    ("生物医药", &["生物医药", "创新药", "疫苗", "医疗"]),
];

/// Families with at least one member concept on each side, in table order.
pub fn shared_families(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    FAMILIES
        .iter()
        .filter(|(_, members)| touches(a, members) && touches(b, members))
        .map(|(family, _)| family.to_string())
        .collect()
}

/// The family a concept belongs to, if any.
pub fn family_of(concept: &str) -> Option<&'static str> {
    FAMILIES
        .iter()
        .find(|(_, members)| members.contains(&concept))
        .map(|(family, _)| *family)
}

fn touches(concepts: &BTreeSet<String>, members: &[&str]) -> bool {
    concepts.iter().any(|c| members.contains(&c.as_str()))
}
