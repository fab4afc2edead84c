//! Administrative region tables.
//!
//! The province table covers every provincial-level code. The region table is
//! a curated set of district codes used for generation; numbers from other
//! districts still validate, they just carry no region name.

use serde::Serialize;

/// A 6-digit administrative region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    pub code: &'static str,
    pub city: &'static str,
    pub district: &'static str,
}

impl Region {
    /// Province name for this region.
    pub fn province(&self) -> Option<&'static str> {
        province_name(self.code)
    }

    /// Full display name, e.g. `北京市东城区`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.city, self.district)
    }
}

const PROVINCES: &[(&str, &str)] = &[
    ("11", "北京市"),
    ("12", "天津市"),
    ("13", "河北省"),
    ("14", "山西省"),
    ("15", "内蒙古自治区"),
    ("21", "辽宁省"),
    ("22", "吉林省"),
    ("23", "黑龙江省"),
    ("31", "上海市"),
    ("32", "江苏省"),
    ("33", "浙江省"),
    ("34", "安徽省"),
    ("35", "福建省"),
    ("36", "江西省"),
    ("37", "山东省"),
    ("41", "河南省"),
    ("42", "湖北省"),
    ("43", "湖南省"),
    ("44", "广东省"),
    ("45", "广西壮族自治区"),
    ("46", "海南省"),
    ("50", "重庆市"),
    ("51", "四川省"),
    ("52", "贵州省"),
    ("53", "云南省"),
    ("54", "西藏自治区"),
    ("61", "陕西省"),
    ("62", "甘肃省"),
    ("63", "青海省"),
    ("64", "宁夏回族自治区"),
    ("65", "新疆维吾尔自治区"),
    ("71", "台湾省"),
    ("81", "香港特别行政区"),
    ("82", "澳门特别行政区"),
];

macro_rules! region {
    ($code:literal, $city:literal, $district:literal) => {
        Region {
            code: $code,
            city: $city,
            district: $district,
        }
    };
}

const REGIONS: &[Region] = &[
    region!("110101", "北京市", "东城区"),
    region!("110102", "北京市", "西城区"),
    region!("110105", "北京市", "朝阳区"),
    region!("110106", "北京市", "丰台区"),
    region!("110108", "北京市", "海淀区"),
    region!("120101", "天津市", "和平区"),
    region!("120103", "天津市", "河西区"),
    region!("130102", "石家庄市", "长安区"),
    region!("130202", "唐山市", "路南区"),
    region!("140105", "太原市", "小店区"),
    region!("150102", "呼和浩特市", "新城区"),
    region!("210102", "沈阳市", "和平区"),
    region!("210202", "大连市", "中山区"),
    region!("220102", "长春市", "南关区"),
    region!("230102", "哈尔滨市", "道里区"),
    region!("310101", "上海市", "黄浦区"),
    region!("310104", "上海市", "徐汇区"),
    region!("310115", "上海市", "浦东新区"),
    region!("320102", "南京市", "玄武区"),
    region!("320505", "苏州市", "虎丘区"),
    region!("330106", "杭州市", "西湖区"),
    region!("330203", "宁波市", "海曙区"),
    region!("340102", "合肥市", "瑶海区"),
    region!("350102", "福州市", "鼓楼区"),
    region!("350203", "厦门市", "思明区"),
    region!("360102", "南昌市", "东湖区"),
    region!("370102", "济南市", "历下区"),
    region!("370202", "青岛市", "市南区"),
    region!("410102", "郑州市", "中原区"),
    region!("420102", "武汉市", "江岸区"),
    region!("430102", "长沙市", "芙蓉区"),
    region!("440103", "广州市", "荔湾区"),
    region!("440106", "广州市", "天河区"),
    region!("440303", "深圳市", "罗湖区"),
    region!("440305", "深圳市", "南山区"),
    region!("450102", "南宁市", "兴宁区"),
    region!("460105", "海口市", "秀英区"),
    region!("500103", "重庆市", "渝中区"),
    region!("500106", "重庆市", "沙坪坝区"),
    region!("510104", "成都市", "锦江区"),
    region!("510107", "成都市", "武侯区"),
    region!("520102", "贵阳市", "南明区"),
    region!("530102", "昆明市", "五华区"),
    region!("540102", "拉萨市", "城关区"),
    region!("610102", "西安市", "新城区"),
    region!("610113", "西安市", "雁塔区"),
    region!("620102", "兰州市", "城关区"),
    region!("630102", "西宁市", "城东区"),
    region!("640104", "银川市", "兴庆区"),
    region!("650102", "乌鲁木齐市", "天山区"),
];

/// All regions available for generation.
pub fn regions() -> &'static [Region] {
    REGIONS
}

/// Look up a region by its exact 6-digit code.
pub fn find_region(code: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.code == code)
}

/// All regions whose code starts with `prefix`.
///
/// An empty prefix matches nothing; use [`regions`] for the full table.
pub fn find_regions(prefix: &str) -> Vec<&'static Region> {
    if prefix.is_empty() {
        return Vec::new();
    }
    REGIONS.iter().filter(|r| r.code.starts_with(prefix)).collect()
}

/// Province name for a code whose first two digits are a province code.
pub fn province_name(code: &str) -> Option<&'static str> {
    let prefix = code.get(..2)?;
    PROVINCES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_codes_are_unique_and_well_formed() {
        let unique: std::collections::HashSet<_> = REGIONS.iter().map(|r| r.code).collect();
        assert_eq!(unique.len(), REGIONS.len(), "Duplicate region codes found!");

        for region in REGIONS {
            assert_eq!(region.code.len(), 6);
            assert!(region.code.bytes().all(|b| b.is_ascii_digit()));
            assert!(region.province().is_some(), "no province for {}", region.code);
        }
    }

    #[test]
    fn test_find_region() {
        let region = find_region("110105").unwrap();
        assert_eq!(region.full_name(), "北京市朝阳区");
        assert_eq!(region.province(), Some("北京市"));
        assert!(find_region("999999").is_none());
    }

    #[test]
    fn test_find_regions_by_prefix() {
        let guangdong = find_regions("44");
        assert_eq!(guangdong.len(), 4);
        assert!(guangdong.iter().all(|r| r.code.starts_with("44")));

        assert_eq!(find_regions("4403").len(), 2);
        assert!(find_regions("").is_empty());
        assert!(find_regions("99").is_empty());
    }

    #[test]
    fn test_province_name() {
        assert_eq!(province_name("440305"), Some("广东省"));
        assert_eq!(province_name("65"), Some("新疆维吾尔自治区"));
        assert_eq!(province_name("99"), None);
        assert_eq!(province_name("1"), None);
    }
}
