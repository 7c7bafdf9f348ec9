//! Shared test fixtures for the LTV desk integration tests.
//!
//! Provides a sample registry document, a fully populated customer record,
//! and a `MemoryStore` seeded with a few customers.

#![allow(dead_code)]

use chrono::DateTime;
use ltv_desk::models::{CoOwner, FeeInputs};
use ltv_desk::store::RecordStore;
use ltv_desk::{CustomerRecord, LoanLine, LoanStatus, MemoryStore};

/// Registry text in the shape produced by PDF text extraction.
pub const SAMPLE_REGISTRY: &str = "\
등기사항전부증명서(말소사항 포함) - 집합건물
[집합건물] 서울특별시 강남구 역삼동 123-4 래미안아파트 제101동 제2층 제201호
고유번호 1146-2011-000123

【 표 제 부 】 ( 1동의 건물의 표시 )
1 2011년3월2일 서울특별시 강남구 역삼동 123-4
철근콘크리트구조 1층 1,234.5678㎡

( 대지권의 목적인 토지의 표시 )
1 서울특별시 강남구 역삼동 123-4 대 5432.1㎡

【 표 제 부 】 ( 전유부분의 건물의 표시 )
1 2011년3월2일 제2층 제201호 철근콘크리트구조
84.9700㎡

주요 등기사항 요약 (참고용)
1. 소유지분현황 ( 갑구 )
홍길동 (공유자)
750101-*******
   지분 2분의 1

김영희 (공유자)
780202-*******
   지분 2분의 1

2. 소유지분을 제외한 소유권에 관한 사항 ( 갑구 )
- 기록사항 없음
";

/// Registry text without the building header; only a `소재지` field.
pub const LOCATION_ONLY_REGISTRY: &str = "\
토지등기부
소재지: 경기도 성남시 분당구 정자동 45
면적 330.5 ㎡
";

pub fn sample_line(lender: &str, face: i64, principal: i64, status: LoanStatus) -> LoanLine {
    LoanLine {
        lender: lender.to_string(),
        face_amount: face,
        ratio_percent: 120,
        principal,
        status,
    }
}

/// A record with every field populated.
pub fn sample_record(name: &str) -> CustomerRecord {
    CustomerRecord {
        name: name.to_string(),
        address: "서울특별시 강남구 역삼동 123-4 제101동 제12층 제1201호".to_string(),
        region: "서울특별시".to_string(),
        deduction: 5500,
        appraised_value: 85000,
        area_text: "84.97㎡".to_string(),
        rate_inputs: vec!["80".to_string(), "70".to_string()],
        selected_rates: vec![80, 70],
        loan_lines: vec![
            sample_line("국민은행", 24000, 20000, LoanStatus::Maintained),
            sample_line("OK저축은행", 6000, 5000, LoanStatus::Refinanced),
        ],
        fees: FeeInputs {
            consult_amount: 10000,
            consult_rate: 1.5,
            bridge_amount: 5000,
            bridge_rate: 0.7,
        },
        co_owners: vec![CoOwner {
            name: "홍길동".to_string(),
            birth: "750101".to_string(),
        }],
        summary_text: "고객명 : 테스트".to_string(),
        saved_at: DateTime::parse_from_rfc3339("2024-05-01T09:30:00+09:00").ok(),
    }
}

/// A `MemoryStore` holding `"김철수"` and `"이영희"`.
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_record(&sample_record("김철수")).unwrap();
    store.create_record(&sample_record("이영희")).unwrap();
    store
}

/// Build an empty-content PDF with `page_count` pages. The first page
/// carries a link annotation to each of `uris`.
pub fn pdf_with_links(page_count: usize, uris: &[&str]) -> Vec<u8> {
    use lopdf::{dictionary, Document, Object, ObjectId};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let annotations: Vec<Object> = uris
        .iter()
        .map(|uri| {
            Object::Dictionary(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
                "A" => dictionary! {
                    "S" => "URI",
                    "URI" => Object::string_literal(*uri),
                },
            })
        })
        .collect();

    let mut page_ids: Vec<Object> = Vec::new();
    for i in 0..page_count {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        if i == 0 && !annotations.is_empty() {
            page.set("Annots", annotations.clone());
        }
        page_ids.push(doc.add_object(page).into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
