use crate::infra::{
    demo_wallet, seed_demo_catalog, InMemoryBenefitCatalog, RecordingSubmissionGateway,
    DEMO_BENEFIT_ID,
};
use benefit_forms::error::AppError;
use benefit_forms::forms::{
    assemble, build_application_schema, build_document_schema, group_fields, normalize,
    ApplicantContext, ApplicationFields, BenefitFormService, CompiledFormView, WalletDocument,
};
use clap::Args;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CompileArgs {
    /// JSON file holding the benefit's declared application fields
    #[arg(long)]
    pub(crate) fields: PathBuf,
    /// JSON file holding the eligibility / required-document rule feed
    #[arg(long)]
    pub(crate) rules: PathBuf,
    /// Optional JSON file holding the applicant's document wallet
    #[arg(long)]
    pub(crate) wallet: Option<PathBuf>,
    /// Title for the generated schema
    #[arg(long, default_value = "")]
    pub(crate) title: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Compile only; skip the submission half of the demo
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

/// Compiles a schema from definition files and prints the renderable output.
pub(crate) fn run_compile(args: CompileArgs) -> Result<(), AppError> {
    let CompileArgs {
        fields,
        rules,
        wallet,
        title,
    } = args;

    let declared: ApplicationFields = serde_json::from_str(&std::fs::read_to_string(fields)?)?;
    let declared = match declared {
        ApplicationFields::Flat(list) => group_fields(list),
        grouped => grouped,
    };
    let rule_feed: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(rules)?)?;
    let wallet: Vec<WalletDocument> = match wallet {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let application = build_application_schema(&declared);
    let normalized = normalize(&rule_feed);
    let documents = build_document_schema(&normalized, &wallet);
    let form = assemble(&title, application, documents);

    let output = json!({
        "schema": form.schema_value(),
        "uiSchema": form.ui_value(),
        "missingDocuments": form.missing_documents(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// End-to-end walk through the pipeline against the seeded demo benefit:
/// compile the schema for a sample wallet, fill the form, and submit.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = Arc::new(InMemoryBenefitCatalog::default());
    seed_demo_catalog(&catalog);
    let gateway = Arc::new(RecordingSubmissionGateway::default());
    let service = BenefitFormService::new(catalog, gateway.clone());

    let mut profile = Map::new();
    profile.insert("firstName".to_string(), json!("Asha"));
    profile.insert("external_application_id".to_string(), json!(4521));

    let applicant = ApplicantContext {
        wallet: demo_wallet(),
        profile,
    };

    println!("Benefit form compilation demo");
    println!("Benefit: {DEMO_BENEFIT_ID}");

    let view = service.compile(DEMO_BENEFIT_ID, &applicant)?;
    render_compiled_form(&view);

    if args.skip_submission {
        return Ok(());
    }

    println!("\nSubmission demo");
    let filled = demo_form_data(&view);
    let receipt = service.submit(DEMO_BENEFIT_ID, &applicant, &filled)?;
    println!("- Accepted with order id {}", receipt.order_id);

    for payload in gateway.submissions() {
        println!(
            "- Forwarded payload: {} personal fields, {} file uploads, {} VC documents",
            payload.personal.len(),
            payload.files.len(),
            payload.vc_documents.len()
        );
        for document in &payload.vc_documents {
            println!(
                "    - {} ({}) from {}",
                document.document_type, document.document_subtype, document.document_imported_from
            );
        }
    }

    Ok(())
}

fn render_compiled_form(view: &CompiledFormView) {
    println!("\nCompiled fields");
    for (name, schema) in view.form.properties() {
        let kind = if view.form.document_fields.contains(&name.to_string()) {
            "document"
        } else {
            "personal"
        };
        println!("- {} [{}]: {}", name, kind, schema.title);
    }

    println!("\nRequired: {}", view.form.required.join(", "));
    println!("Render order: {}", view.form.ui.order.join(" -> "));

    if view.missing_documents.is_empty() {
        println!("Missing documents: none");
    } else {
        println!("Missing documents");
        for missing in &view.missing_documents {
            println!("- {}: {}", missing.field, missing.message);
        }
    }

    if !view.prefill.is_empty() {
        println!("\nPre-filled values");
        for (name, value) in &view.prefill {
            println!("- {name} = {value}");
        }
    }
}

/// Fills the compiled form the way the demo applicant would: prefill carried
/// over, canned personal answers, document selectors resolved to their first
/// offered option, uploads given placeholder bytes.
fn demo_form_data(view: &CompiledFormView) -> Map<String, Value> {
    let mut filled = view.prefill.clone();

    filled.insert("firstName".to_string(), json!("Asha"));
    filled.insert("dateOfBirth".to_string(), json!("2004-06-12"));
    filled.insert("gender".to_string(), json!("female"));
    filled.insert("bankAccountNumber".to_string(), json!("123456789012"));

    for name in &view.form.document_fields {
        let selection = view
            .form
            .field(name)
            .and_then(|schema| schema.default.clone())
            .filter(|value| !value.is_empty());

        match selection {
            Some(value) => {
                filled.insert(name.clone(), json!(value));
            }
            None => {
                filled.insert(name.clone(), json!("demo-upload-bytes"));
            }
        }
    }

    filled
}
