//! Province reference data.
//!
//! Province codes across the workspace are the single-character
//! abbreviations. This table resolves every other spelling onto them.

use serde::Serialize;

use crate::errors::{AtlasError, AtlasResult};

/// One province-level division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Province {
    /// Single-character abbreviation, e.g. `粤`.
    pub code: &'static str,
    /// Short full name, e.g. `广东`.
    pub name: &'static str,
    /// Official name with administrative suffix, e.g. `广东省`.
    pub official_name: &'static str,
    /// Six-digit administrative division code.
    pub admin_code: &'static str,
}

const fn p(
    code: &'static str,
    name: &'static str,
    official_name: &'static str,
    admin_code: &'static str,
) -> Province {
    Province {
        code,
        name,
        official_name,
        admin_code,
    }
}

static PROVINCES: [Province; 34] = [
    p("京", "北京", "北京市", "110000"),
    p("津", "天津", "天津市", "120000"),
    p("冀", "河北", "河北省", "130000"),
    p("晋", "山西", "山西省", "140000"),
    p("蒙", "内蒙古", "内蒙古自治区", "150000"),
    p("辽", "辽宁", "辽宁省", "210000"),
    p("吉", "吉林", "吉林省", "220000"),
    p("黑", "黑龙江", "黑龙江省", "230000"),
    p("沪", "上海", "上海市", "310000"),
    p("苏", "江苏", "江苏省", "320000"),
    p("浙", "浙江", "浙江省", "330000"),
    p("皖", "安徽", "安徽省", "340000"),
    p("闽", "福建", "福建省", "350000"),
    p("赣", "江西", "江西省", "360000"),
    p("鲁", "山东", "山东省", "370000"),
    p("豫", "河南", "河南省", "410000"),
    p("鄂", "湖北", "湖北省", "420000"),
    p("湘", "湖南", "湖南省", "430000"),
    p("粤", "广东", "广东省", "440000"),
    p("桂", "广西", "广西壮族自治区", "450000"),
    p("琼", "海南", "海南省", "460000"),
    p("渝", "重庆", "重庆市", "500000"),
    p("川", "四川", "四川省", "510000"),
    p("贵", "贵州", "贵州省", "520000"),
    p("云", "云南", "云南省", "530000"),
    p("藏", "西藏", "西藏自治区", "540000"),
    p("陕", "陕西", "陕西省", "610000"),
    p("甘", "甘肃", "甘肃省", "620000"),
    p("青", "青海", "青海省", "630000"),
    p("宁", "宁夏", "宁夏回族自治区", "640000"),
    p("新", "新疆", "新疆维吾尔自治区", "650000"),
    p("台", "台湾", "台湾省", "710000"),
    p("港", "香港", "香港特别行政区", "810000"),
    p("澳", "澳门", "澳门特别行政区", "820000"),
];

/// Immutable lookup over the province list.
#[derive(Debug, Clone, Copy)]
pub struct ProvinceTable {
    provinces: &'static [Province],
}

impl Default for ProvinceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProvinceTable {
    pub fn standard() -> Self {
        Self {
            provinces: &PROVINCES,
        }
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Province> {
        self.provinces.iter()
    }

    /// Find a province by abbreviation, short name, official name or
    /// administrative code.
    pub fn lookup(&self, input: &str) -> Option<&'static Province> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.provinces.iter().find(|p| {
            p.code == input || p.name == input || p.official_name == input || p.admin_code == input
        })
    }

    /// Like `lookup`, but unknown input is an error.
    pub fn resolve(&self, input: &str) -> AtlasResult<&'static Province> {
        self.lookup(input).ok_or_else(|| AtlasError::ProvinceNotFound {
            code: input.trim().to_string(),
        })
    }

    /// Canonical code for `input`. Unknown input passes through trimmed.
    pub fn normalize(&self, input: &str) -> String {
        match self.lookup(input) {
            Some(p) => p.code.to_string(),
            None => input.trim().to_string(),
        }
    }

    /// Short full name for a code. Unknown codes map to themselves.
    pub fn full_name<'a>(&self, code: &'a str) -> &'a str {
        match self.lookup(code) {
            Some(p) => p.name,
            None => code,
        }
    }

    pub fn admin_code(&self, code: &str) -> Option<&'static str> {
        self.lookup(code).map(|p| p.admin_code)
    }
}
