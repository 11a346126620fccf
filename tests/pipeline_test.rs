//! End-to-end tests of the parse → decipher → emit pipeline over in-memory
//! exports.

use qb2iif::{
    decipher, group_by_transaction, parse_records, Amount, AmountSign, ConvertError,
    ConverterConfig, DecipherError, LedgerEmitter, Record, TransactionId,
};
use std::io::Cursor;

const HEADER: &str = "AccountName,Trans #,Type,Date,Num,Name,Memo,Clr,Split,Debit,Credit,Balance";

fn credit_positive() -> ConverterConfig {
    ConverterConfig {
        amount_sign: AmountSign::CreditPositive,
        ..ConverterConfig::default()
    }
}

fn parse(csv: &str, config: &ConverterConfig) -> Vec<Record> {
    parse_records(Cursor::new(csv.to_string()), config).unwrap()
}

fn run(csv: &str, config: &ConverterConfig) -> (String, Vec<String>) {
    let records = parse(csv, config);
    let mut output = Vec::new();
    let mut messages: Vec<String> = Vec::new();
    LedgerEmitter::new(config)
        .emit(&records, &mut output, &mut messages)
        .unwrap();
    (String::from_utf8(output).unwrap(), messages)
}

fn block_for<'a>(output: &'a str, payee: &str) -> Vec<Vec<&'a str>> {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.starts_with("TRNS\t") && line.split('\t').nth(5) == Some(payee))
        .unwrap();
    lines[start..]
        .iter()
        .take_while(|line| **line != "ENDTRNS")
        .map(|line| line.split('\t').collect())
        .collect()
}

// ==================== PARSING ====================

#[test]
fn test_credit_column_deposit_scenario() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         ,75,Deposit,4/11/2001,,transfer,,,#3923,,10000.00,199988.90\n\
         Total #3923,,,,,,,,,2585108.20,2601597.58,-16489.38\n"
    );
    let records = parse(&csv, &credit_positive());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].account_path.segments(), ["Bank".to_string()]);
    assert_eq!(records[0].amount, Amount::parse_lenient("10000.00"));
}

#[test]
fn test_account_depth_follows_headers_and_totals() {
    let csv = format!(
        "{HEADER}\n\
         Assets,,,,,,,,,,,\n\
         Current Assets,,,,,,,,,,,\n\
         Checking,,,,,,,,,,,\n\
         ,1,Check,1/1/2004,,a,,,Phone,,1.00,\n\
         Total Checking,,,,,,,,,,,\n\
         Savings,,,,,,,,,,,\n\
         ,2,Check,1/1/2004,,a,,,Phone,,1.00,\n\
         Total Savings,,,,,,,,,,,\n\
         Total Current Assets,,,,,,,,,,,\n\
         ,3,Check,1/1/2004,,a,,,Phone,,1.00,\n"
    );
    let records = parse(&csv, &ConverterConfig::default());

    let paths: Vec<String> = records.iter().map(|r| r.account_path.joined()).collect();
    assert_eq!(
        paths,
        [
            "Assets:Current Assets:Checking",
            "Assets:Current Assets:Savings",
            "Assets",
        ]
    );
}

#[test]
fn test_quoted_fields() {
    let csv = format!(
        "{HEADER}\n\
         \"Bank, Main\",,,,,,,,,,,\n\
         ,1877,Check,1/10/2004,5720,\"Ace Sales and Service\",\"parts, labor\",,\"Misc,\",,75.00,\n"
    );
    let records = parse(&csv, &ConverterConfig::default());

    assert_eq!(records[0].account_path.joined(), "Bank, Main");
    assert_eq!(records[0].memo, "parts, labor");
    assert_eq!(records[0].split_label, "Misc,");
    assert_eq!(records[0].amount.to_string(), "-75.00");
}

#[test]
fn test_stack_underflow_is_fatal() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         Total Bank,,,,,,,,,,,\n\
         Total Bank,,,,,,,,,,,\n"
    );
    let err = parse_records(Cursor::new(csv), &ConverterConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::AccountStackUnderflow { line: 4, .. }));
}

// ==================== DECIPHERING ====================

#[test]
fn test_transaction_split_across_sections() {
    let csv = format!(
        "{HEADER}\n\
         Sterling MM #17656,,,,,,,,,,,\n\
         ,1322,Check,12/30/2000,,from year end,,,Opening Balance,209988.90,,\n\
         Total Sterling MM #17656,,,,,,,,,,,\n\
         Test data,,,,,,,,,,,\n\
         ,1322,Check,1/10/2004,5719,Intermountain West Insulation,,,Insulation,,0.01,\n\
         ,1322,Check,1/10/2004,5720,Ace Sales and Service,,,\"Misc,\",,209988.89,\n\
         Total Test data,,,,,,,,,,,\n"
    );
    let config = credit_positive();
    let records = parse(&csv, &config);
    let groups = group_by_transaction(&records);
    let group = &groups[&TransactionId::from("1322")];

    let transaction = decipher(group, &config).unwrap();
    assert!(std::ptr::eq(transaction.main, &records[0]));
    assert_eq!(transaction.splits.len(), 2);
    assert_eq!(transaction.splits[0].as_ref(), &records[1]);
    assert_eq!(transaction.splits[1].as_ref(), &records[2]);
}

#[test]
fn test_equal_and_opposite_legs_decipher_for_either_direction() {
    for (kind, main_amount, split_amount) in [("Deposit", "25.00", "-25.00"), ("Check", "-25.00", "25.00")] {
        let csv = format!(
            "AccountName,Trans #,Type,Date,Name,Memo,Split,Amount\n\
             Bank,,,,,,,\n\
             ,9,{kind},1/1/2004,Payee,,Other,{main_amount}\n\
             ,9,{kind},1/1/2004,Payee,,Bank,{split_amount}\n"
        );
        let config = ConverterConfig::default();
        let records = parse(&csv, &config);
        let legs: Vec<&Record> = records.iter().collect();

        let transaction = decipher(&legs, &config).unwrap();
        assert!(std::ptr::eq(transaction.main, &records[0]), "{kind}");
        assert_eq!(transaction.splits.len(), 1, "{kind}");
        assert_eq!(transaction.splits[0].as_ref(), &records[1], "{kind}");
    }
}

#[test]
fn test_lone_leg_with_unresolved_marker() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         ,109,Deposit,5/1/2001,,transfer,,,-SPLIT-,55000.00,,\n"
    );
    let config = ConverterConfig::default();
    let records = parse(&csv, &config);
    let legs: Vec<&Record> = records.iter().collect();

    assert_eq!(decipher(&legs, &config), Err(DecipherError::UnresolvableSplit));
}

#[test]
fn test_lone_leg_without_label() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         ,110,Check,5/1/2001,,transfer,,,,,12.00,\n"
    );
    let config = ConverterConfig::default();
    let records = parse(&csv, &config);
    let legs: Vec<&Record> = records.iter().collect();

    assert_eq!(decipher(&legs, &config), Err(DecipherError::MissingSplit));
}

// ==================== EMISSION ====================

#[test]
fn test_synthesized_split_is_written() {
    let csv = format!(
        "{HEADER}\n\
         Sterling MM #17656,,,,,,,,,,,\n\
         ,108,Deposit,5/1/2001,,transfer,,,split,55000.00,,\n"
    );
    let (output, messages) = run(&csv, &ConverterConfig::default());
    assert!(messages.is_empty());

    let block = block_for(&output, "transfer");
    assert_eq!(block.len(), 2);
    assert_eq!(block[0][4], "Sterling MM #17656");
    assert_eq!(block[0][6], "55000.00");
    assert_eq!(block[1][0], "SPL");
    assert_eq!(block[1][4], "split");
    assert_eq!(block[1][6], "-55000.00");
}

#[test]
fn test_failed_groups_do_not_block_others() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         ,1,Deposit,1/1/2004,,good,,,Sales,10.00,,\n\
         ,2,Deposit,1/1/2004,,unbalanced,,,Sales,10.00,,\n\
         ,3,Payment,1/1/2004,,unsupported,,,Sales,10.00,,\n\
         Total Bank,,,,,,,,,,,\n\
         Sales,,,,,,,,,,,\n\
         ,2,Deposit,1/1/2004,,unbalanced,,,Bank,,9.00,\n\
         Total Sales,,,,,,,,,,,\n"
    );
    let (output, messages) = run(&csv, &ConverterConfig::default());

    assert_eq!(block_for(&output, "good").len(), 2);
    assert!(!output.contains("unbalanced"));
    assert!(!output.contains("unsupported"));
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("2 - The sum of the splits"));
    assert!(messages[1].contains("[Payment]"));
    assert!(messages[1].ends_with("[3]"));
}

#[test]
fn test_every_row_has_the_declared_width() {
    let csv = format!(
        "{HEADER}\n\
         Bank,,,,,,,,,,,\n\
         ,1,Deposit,1/1/2004,7,Payee,memo,,Sales,10.00,,\n"
    );
    let (output, _) = run(&csv, &ConverterConfig::default());

    for line in output.lines().filter(|line| !line.ends_with("ENDTRNS")) {
        assert_eq!(line.split('\t').count(), qb2iif::iif::COLUMN_COUNT, "{line}");
    }
}
