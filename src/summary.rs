//! Shareable plain-text summary of a customer's LTV evaluation.

use std::fmt::Write;

use crate::form::Evaluation;
use crate::models::CustomerRecord;
use crate::number::format_with_commas;

/// Render the summary block.
///
/// Sections, in order: header, valuation line, loan items (only lines with
/// content), one result line per selected rate, principal totals by status,
/// and the fee breakdown when any fee is due.
pub fn compose_summary(record: &CustomerRecord, evaluation: &Evaluation) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "고객명 : {}", record.name);
    let _ = writeln!(out, "주소 : {}", record.address);

    let price = if record.appraised_value != 0 {
        format_with_commas(record.appraised_value)
    } else {
        evaluation.price_text.clone()
    };
    let _ = writeln!(
        out,
        "{} | KB시세: {} | 전용면적 : {} | 방공제 금액 : {}만",
        evaluation.tier.label(),
        price,
        record.area_text,
        format_with_commas(record.deduction)
    );

    let items: Vec<_> = record
        .loan_lines
        .iter()
        .filter(|line| line.is_meaningful())
        .collect();
    if !items.is_empty() {
        out.push_str("\n대출 항목\n");
        for line in items {
            let _ = writeln!(
                out,
                "{} | 채권최고액: {} | 비율: {}% | 원금: {} | {}",
                line.lender,
                format_with_commas(line.face_amount),
                line.ratio_percent,
                format_with_commas(line.principal),
                line.status.label()
            );
        }
    }

    for &rate in &evaluation.selected_rates {
        if let Some((position, pair)) = evaluation.results.get(rate) {
            let _ = write!(
                out,
                "\n{} LTV {}% {} 가용 {}",
                position.label(),
                rate,
                format_with_commas(pair.limit),
                format_with_commas(pair.available)
            );
        }
    }

    out.push_str("\n진행구분별 원금 합계\n");
    if evaluation.totals.sum_refinanced > 0 {
        let _ = writeln!(
            out,
            "대환: {}만",
            format_with_commas(evaluation.totals.sum_refinanced)
        );
    }
    if evaluation.totals.sum_prepayable > 0 {
        let _ = writeln!(
            out,
            "선말소: {}만",
            format_with_commas(evaluation.totals.sum_prepayable)
        );
    }

    if evaluation.fees.total_fee > 0 {
        let _ = writeln!(
            out,
            "\n수수료 합계: {}만원",
            format_with_commas(evaluation.fees.total_fee)
        );
        let _ = writeln!(
            out,
            "- 컨설팅 수수료: {}만원",
            format_with_commas(evaluation.fees.consult_fee)
        );
        let _ = writeln!(
            out,
            "- 브릿지 수수료: {}만원",
            format_with_commas(evaluation.fees.bridge_fee)
        );
    }

    out
}
