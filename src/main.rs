//! Interactive LTV desk.
//!
//! Reads one command per line from stdin. Store settings come from the
//! environment or the config file; there are no command-line flags.

use std::fs;
use std::io::{self, BufRead, Write};

use ltv_desk::config;
use ltv_desk::number::format_with_commas;
use ltv_desk::store::RecordStore;
use ltv_desk::{
    Desk, FieldEdit, LoanStatus, LtvError, MemoryStore, RegistryExtract, Result, SaveChoice,
};

const HELP: &str = "\
commands:
  show                         print the form and summary
  set <field> <value>          name | address | region | deduction | price | area |
                               rate1 | rate2 | consult | consult-rate | bridge | bridge-rate
  lines <n>                    number of loan rows (1-10)
  line <n> <field> <value>     lender | face | ratio | principal | status (유지/대환/선말소)
  pdf <path>                   pre-fill from a registry PDF
  text <path>                  pre-fill from registry text already extracted
  regions                      list regional deductions
  customers                    list stored customers
  refresh                      re-fetch customers from the store
  load <name>                  load a stored customer
  delete <name>                archive a stored customer
  reset                        clear the form
  save                         save as a new customer
  update                       overwrite the loaded customer
  help | quit";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Desk::builder().build() {
        Ok(desk) => run(desk),
        Err(e) => {
            warn(&format!("Customer store unavailable ({e}); records will not persist"));
            run(Desk::new(MemoryStore::new()));
        }
    }
}

fn warn(message: &str) {
    log::warn!("{}", message);
    println!("⚠ {}", message);
}

fn run<S: RecordStore>(mut desk: Desk<S>) {
    if let Err(e) = desk.refresh() {
        warn(&format!("Failed to fetch customers: {e}"));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    println!("LTV desk. Type 'help' for commands.");

    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let result = dispatch(&mut desk, line, &mut |prompt: &str| {
            print!("{} ", prompt);
            let _ = io::stdout().flush();
            lines.next().and_then(|l| l.ok()).unwrap_or_default()
        });
        if let Err(e) = result {
            warn(&e.to_string());
        }
    }
}

fn dispatch<S: RecordStore>(
    desk: &mut Desk<S>,
    line: &str,
    ask: &mut dyn FnMut(&str) -> String,
) -> Result<()> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "help" => println!("{}", HELP),
        "show" => show(desk),
        "set" => {
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            desk.edit(form_edit(field, value)?)?;
            print_summary(desk);
        }
        "lines" => {
            let n = rest
                .parse()
                .map_err(|_| LtvError::InvalidArgument(format!("Not a row count: {rest}")))?;
            desk.edit(FieldEdit::LineCount(n))?;
            show(desk);
        }
        "line" => {
            let mut parts = rest.splitn(3, ' ');
            let index = parts
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n >= 1)
                .ok_or_else(|| LtvError::InvalidArgument("Rows are numbered from 1".into()))?;
            let field = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            desk.edit(line_edit(index - 1, field, value)?)?;
            show_lines(desk);
            print_summary(desk);
        }
        "pdf" => {
            let bytes = fs::read(rest)?;
            let extract = RegistryExtract::from_pdf(&bytes)?;
            println!("PDF: {} pages", extract.page_count);
            if !extract.external_links.is_empty() {
                warn("PDF contains external links:");
                for uri in &extract.external_links {
                    println!("    {}", uri);
                }
            }
            ingest(desk, &extract);
        }
        "text" => {
            let text = fs::read_to_string(rest)?;
            ingest(desk, &RegistryExtract::from_text(&text));
        }
        "regions" => {
            for (name, amount) in config::region_deductions() {
                println!("  {}  {}만", name, format_with_commas(*amount));
            }
        }
        "customers" => {
            let names = desk.customer_names();
            if names.is_empty() {
                println!("(no customers)");
            }
            for name in names {
                println!("  {}", name);
            }
        }
        "refresh" => {
            desk.refresh()?;
            println!("{} customers", desk.snapshot().len());
        }
        "load" => {
            desk.load(rest)?;
            println!("✅ Loaded '{}'", rest);
            show(desk);
        }
        "delete" => {
            desk.delete(rest)?;
            println!("🗑 Archived '{}'", rest);
        }
        "reset" => {
            desk.reset();
            println!("Form cleared");
        }
        "save" => match desk.save_as_new() {
            Ok(()) => println!("✅ Saved '{}'", desk.form().customer_name),
            Err(LtvError::Conflict(_)) => {
                let prompt = format!(
                    "'{}' already exists. [o]verwrite / [n]ew / [c]ancel:",
                    desk.form().customer_name
                );
                let choice = match ask(&prompt).trim() {
                    "o" | "overwrite" => SaveChoice::Overwrite,
                    "n" | "new" => SaveChoice::AddNew,
                    _ => {
                        println!("Save cancelled");
                        return Ok(());
                    }
                };
                let name = desk.resolve_conflict(choice)?;
                println!("✅ Saved '{}'", name);
            }
            Err(e) => return Err(e),
        },
        "update" => {
            desk.update()?;
            println!("✅ Updated '{}'", desk.form().customer_name);
        }
        other => {
            return Err(LtvError::InvalidArgument(format!(
                "Unknown command '{other}' (try 'help')"
            )))
        }
    }
    Ok(())
}

fn form_edit(field: &str, value: &str) -> Result<FieldEdit> {
    let value = value.to_string();
    Ok(match field {
        "name" => FieldEdit::CustomerName(value),
        "address" => FieldEdit::Address(value),
        "region" => FieldEdit::Region(value),
        "deduction" => FieldEdit::Deduction(value),
        "price" => FieldEdit::Price(value),
        "area" => FieldEdit::Area(value),
        "rate1" => FieldEdit::Rate(0, value),
        "rate2" => FieldEdit::Rate(1, value),
        "consult" => FieldEdit::ConsultAmount(value),
        "consult-rate" => FieldEdit::ConsultRate(value),
        "bridge" => FieldEdit::BridgeAmount(value),
        "bridge-rate" => FieldEdit::BridgeRate(value),
        other => {
            return Err(LtvError::InvalidArgument(format!("Unknown field '{other}'")));
        }
    })
}

fn line_edit(index: usize, field: &str, value: &str) -> Result<FieldEdit> {
    let value = value.to_string();
    Ok(match field {
        "lender" => FieldEdit::Lender(index, value),
        "face" => FieldEdit::FaceAmount(index, value),
        "ratio" => FieldEdit::Ratio(index, value),
        "principal" => FieldEdit::Principal(index, value),
        "status" => {
            let status = LoanStatus::from_label(&value).ok_or_else(|| {
                LtvError::InvalidArgument(format!("Unknown status '{value}' (유지/대환/선말소)"))
            })?;
            FieldEdit::Status(index, status)
        }
        other => {
            return Err(LtvError::InvalidArgument(format!("Unknown line field '{other}'")));
        }
    })
}

fn ingest<S: RecordStore>(desk: &mut Desk<S>, extract: &RegistryExtract) {
    desk.ingest_registry(extract);
    println!("📍 Address: {}", extract.address);
    if !extract.area.is_empty() {
        println!("   Area: {}", extract.area);
    }
    for owner in &extract.co_owners {
        println!("   Owner: {} {}", owner.name, owner.birth);
    }
    print_summary(desk);
}

fn show<S: RecordStore>(desk: &Desk<S>) {
    let form = desk.form();
    println!("고객명      {}", form.customer_name);
    println!("주소        {}", form.address);
    println!("방공제 지역 {}", form.region);
    println!("방공제 금액 {}만", format_with_commas(form.evaluation.deduction));
    println!("KB 시세     {}", form.price_input);
    println!("전용면적    {}", form.area_input);
    println!("LTV 비율    {} / {}", form.rate_inputs[0], form.rate_inputs[1]);
    println!(
        "수수료율    컨설팅 {}% / 브릿지 {}%",
        form.fee_inputs.consult_rate, form.fee_inputs.bridge_rate
    );
    show_lines(desk);
    print_summary(desk);
}

fn show_lines<S: RecordStore>(desk: &Desk<S>) {
    for (i, state) in desk.form().lines.iter().enumerate() {
        let line = &state.line;
        println!(
            "  #{} {:<10} 채권최고액 {:>10} | 비율 {:>4}% | 원금 {:>10} | {}",
            i + 1,
            line.lender,
            format_with_commas(line.face_amount),
            line.ratio_percent,
            format_with_commas(line.principal),
            line.status
        );
    }
}

fn print_summary<S: RecordStore>(desk: &Desk<S>) {
    println!("----------------------------------------");
    println!("{}", desk.form().summary.trim_end());
    println!("----------------------------------------");
}
