//! Sector catalog: which sectors to report and which leader securities stand
//! in for each of them.
//!
//! The catalog is explicit configuration handed to the aggregator. Its order
//! is the output order of every snapshot.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, SecurityId, SectorCode, ValidationError};

/// Maximum number of leader securities per sector.
pub const MAX_LEADERS: usize = 3;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSector {
    pub code: SectorCode,
    pub name: String,
    pub leaders: Vec<SecurityId>,
}

/// Validated, ordered list of sectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    sectors: Vec<CatalogSector>,
}

impl Catalog {
    pub fn new(sectors: Vec<CatalogSector>) -> Result<Self, ValidationError> {
        if sectors.is_empty() {
            return Err(ValidationError::EmptyCatalog);
        }

        let mut seen_codes = HashSet::with_capacity(sectors.len());
        for sector in &sectors {
            if !seen_codes.insert(sector.code.as_str()) {
                return Err(ValidationError::DuplicateSector {
                    code: sector.code.to_string(),
                });
            }

            let count = sector.leaders.len();
            if count == 0 || count > MAX_LEADERS {
                return Err(ValidationError::LeaderCount {
                    code: sector.code.to_string(),
                    count,
                    max: MAX_LEADERS,
                });
            }

            let mut seen_leaders = HashSet::with_capacity(count);
            for leader in &sector.leaders {
                if !seen_leaders.insert(leader.as_str()) {
                    return Err(ValidationError::DuplicateLeader {
                        code: sector.code.to_string(),
                        leader: leader.to_string(),
                    });
                }
            }
        }

        Ok(Self { sectors })
    }

    /// Parses a JSON array of `{"code", "name", "leaders"}` objects.
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let sectors: Vec<CatalogSector> = serde_json::from_str(input)?;
        Ok(Self::new(sectors)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// The 33 Tokyo Stock Exchange industry groups with their leader securities.
    pub fn tse33() -> Self {
        let sectors = TSE33
            .iter()
            .map(|(code, name, leaders)| CatalogSector {
                code: SectorCode::from_static(*code),
                name: (*name).to_owned(),
                leaders: leaders.iter().copied().map(SecurityId::from_static).collect(),
            })
            .collect();

        Self { sectors }
    }

    pub fn sectors(&self) -> &[CatalogSector] {
        &self.sectors
    }

    pub fn security_count(&self) -> usize {
        self.sectors.iter().map(|sector| sector.leaders.len()).sum()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::tse33()
    }
}

static TSE33: [(&str, &str, &[&str]); 33] = [
    ("0251", "水産・農林業", &["1332", "1333", "1379"]),
    ("0253", "鉱業", &["1605", "1662", "1515"]),
    ("0254", "建設業", &["1801", "1812", "1928"]),
    ("0256", "食料品", &["2914", "2802", "2502"]),
    ("0255", "繊維製品", &["3402", "3401", "3101"]),
    ("0257", "パルプ・紙", &["3861", "3863", "3880"]),
    ("0258", "化学", &["4063", "4452", "4901"]),
    ("0259", "医薬品", &["4502", "4568", "4519"]),
    ("0260", "石油・石炭製品", &["5020", "5019", "5021"]),
    ("0261", "ゴム製品", &["5108", "5101", "5110"]),
    ("0262", "ガラス・土石製品", &["5201", "5333", "5233"]),
    ("0263", "鉄鋼", &["5401", "5411", "5406"]),
    ("0264", "非鉄金属", &["5802", "5713", "5801"]),
    ("0265", "金属製品", &["5938", "5929", "5947"]),
    ("0266", "機械", &["6301", "6367", "6273"]),
    ("0267", "電気機器", &["6758", "6501", "6861"]),
    ("0268", "輸送用機器", &["7203", "7267", "6902"]),
    ("0269", "精密機器", &["7741", "4543", "7733"]),
    ("0270", "その他製品", &["7974", "7832", "7912"]),
    ("0271", "電気・ガス業", &["9501", "9503", "9531"]),
    ("0272", "陸運業", &["9022", "9020", "9021"]),
    ("0273", "海運業", &["9101", "9104", "9107"]),
    ("0274", "空運業", &["9202", "9201"]),
    ("0275", "倉庫・運輸関連業", &["9301", "9302", "9303"]),
    ("0276", "情報・通信業", &["9432", "9433", "9984"]),
    ("0277", "卸売業", &["8058", "8001", "8031"]),
    ("0278", "小売業", &["9983", "3382", "8267"]),
    ("0279", "銀行業", &["8306", "8316", "8411"]),
    ("0280", "証券、商品先物", &["8604", "8601", "8473"]),
    ("0281", "保険業", &["8766", "8725", "8750"]),
    ("0282", "その他金融業", &["8591", "8593", "8697"]),
    ("0283", "不動産業", &["8801", "8802", "8830"]),
    ("0284", "サービス業", &["6098", "4661", "2413"]),
];
