use amortization_core::extra_payment::{self, ExtraPaymentInput};
use amortization_core::financing::{self, PurchaseInput};
use amortization_core::payment;
use amortization_core::schedule::{self, ScheduleInput};
use amortization_core::{AmortizationError, LoanParameters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn mortgage(amount: Decimal, rate: Decimal, years: Decimal) -> LoanParameters {
    LoanParameters {
        loan_amount: amount,
        annual_interest_rate_percent: rate,
        term_years: years,
    }
}

// ===========================================================================
// Payment
// ===========================================================================

#[test]
fn test_payment_matches_closed_form_reference() {
    // 200k / 5.5% / 30y is the textbook 1,135.58 payment.
    let pmt = payment::monthly_payment(dec!(200_000), dec!(5.5), dec!(30)).unwrap();
    assert_eq!(pmt.round_dp(2), dec!(1135.58));
}

#[test]
fn test_zero_rate_payment_is_exact_division() {
    let pmt = payment::monthly_payment(dec!(150_000), dec!(0), dec!(15)).unwrap();
    assert_eq!(pmt, dec!(150_000) / dec!(180));
    assert_eq!(pmt.round_dp(2), dec!(833.33));
}

#[test]
fn test_totals_compose_for_several_loans() {
    for (amount, rate, years) in [
        (dec!(100_000), dec!(3.25), dec!(15)),
        (dec!(450_000), dec!(7.125), dec!(30)),
        (dec!(25_000), dec!(9.9), dec!(5)),
    ] {
        let pmt = payment::monthly_payment(amount, rate, years).unwrap();
        let interest = payment::total_interest(payment::total_payment(pmt, years).unwrap(), amount);
        assert_eq!(interest, pmt * years * dec!(12) - amount);
    }
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_properties_across_terms() {
    for years in [dec!(1), dec!(10), dec!(15), dec!(30), dec!(40)] {
        let pmt = payment::monthly_payment(dec!(250_000), dec!(6.75), years).unwrap();
        let entries =
            schedule::generate_amortization_schedule(dec!(250_000), pmt, dec!(6.75), years)
                .unwrap();

        assert_eq!(Decimal::from(entries.len() as u64), years * dec!(12));

        let principal: Decimal = entries.iter().map(|e| e.principal).sum();
        assert!((principal - dec!(250_000)).abs() < dec!(1), "{years}y principal {principal}");
        assert!(entries.last().unwrap().remaining_balance < dec!(1));
    }
}

#[test]
fn test_schedule_interest_declines_as_principal_grows() {
    let out = schedule::build_schedule(&ScheduleInput {
        loan: mortgage(dec!(300_000), dec!(4.5), dec!(30)),
        monthly_payment: None,
    })
    .unwrap();
    let entries = &out.result.entries;
    assert!(entries[0].interest > entries[359].interest);
    assert!(entries[0].principal < entries[359].principal);
}

#[test]
fn test_sampled_schedule_ends_with_final_payment() {
    let out = schedule::build_schedule(&ScheduleInput {
        loan: mortgage(dec!(200_000), dec!(5.5), dec!(30)),
        monthly_payment: None,
    })
    .unwrap();
    let view = schedule::sample_schedule(
        &out.result.entries,
        schedule::DEFAULT_SAMPLE_HEAD,
        schedule::DEFAULT_SAMPLE_STRIDE,
    );
    assert_eq!(view.first().unwrap().payment_number, 1);
    assert_eq!(view.last().unwrap().payment_number, 360);
}

// ===========================================================================
// Extra payments
// ===========================================================================

#[test]
fn test_extra_payment_shortens_term_and_saves_interest() {
    let out = extra_payment::calculate_extra_payment_impact(&ExtraPaymentInput {
        loan: mortgage(dec!(300_000), dec!(4.5), dec!(30)),
        extra_monthly_payment: dec!(200),
    })
    .unwrap();
    let r = &out.result;
    assert!(r.new_loan_term_months < 360);
    assert!(r.months_saved > 0);
    assert!(r.interest_saved > Decimal::ZERO);
    assert_eq!(r.new_loan_term_months + r.months_saved, 360);
}

#[test]
fn test_larger_extra_saves_more() {
    let run = |extra| {
        extra_payment::calculate_extra_payment_impact(&ExtraPaymentInput {
            loan: mortgage(dec!(200_000), dec!(5.5), dec!(30)),
            extra_monthly_payment: extra,
        })
        .unwrap()
        .result
    };
    let small = run(dec!(100));
    let large = run(dec!(500));
    assert!(large.new_loan_term_months < small.new_loan_term_months);
    assert!(large.interest_saved > small.interest_saved);
}

#[test]
fn test_extra_payment_zero_is_a_no_op() {
    let out = extra_payment::calculate_extra_payment_impact(&ExtraPaymentInput {
        loan: mortgage(dec!(200_000), dec!(5.5), dec!(30)),
        extra_monthly_payment: Decimal::ZERO,
    })
    .unwrap();
    assert_eq!(out.result.months_saved, 0);
    assert_eq!(out.result.interest_saved, Decimal::ZERO);
    assert_eq!(
        out.result.total_interest_standard,
        out.result.total_interest_with_extra
    );
}

#[test]
fn test_extra_payment_rejects_each_invalid_field() {
    let cases = [
        (mortgage(dec!(0), dec!(5), dec!(30)), dec!(100)),
        (mortgage(dec!(100_000), dec!(-1), dec!(30)), dec!(100)),
        (mortgage(dec!(100_000), dec!(5), dec!(0)), dec!(100)),
        (mortgage(dec!(100_000), dec!(5), dec!(30)), dec!(-50)),
    ];
    for (loan, extra) in cases {
        let result = extra_payment::calculate_extra_payment_impact(&ExtraPaymentInput {
            loan,
            extra_monthly_payment: extra,
        });
        assert!(matches!(result, Err(AmortizationError::InvalidInput { .. })));
    }
}

// ===========================================================================
// Purchase financing and JSON input
// ===========================================================================

#[test]
fn test_purchase_feeds_engine() {
    let input = PurchaseInput {
        property_price: dec!(375_000),
        down_payment: dec!(75_000),
        annual_interest_rate_percent: dec!(4.5),
        term_years: dec!(30),
    };
    let out = financing::analyze_purchase(&input).unwrap();
    let direct = payment::analyze_loan(&mortgage(dec!(300_000), dec!(4.5), dec!(30))).unwrap();
    assert_eq!(out.result.loan, direct.result);
}

#[test]
fn test_extra_payment_input_from_flat_json() {
    let json = r#"{
        "loan_amount": 300000,
        "annual_interest_rate_percent": "4.5",
        "term_years": 30,
        "extra_monthly_payment": 200
    }"#;
    let input: ExtraPaymentInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.loan.loan_amount, dec!(300_000));
    assert_eq!(input.extra_monthly_payment, dec!(200));
}
