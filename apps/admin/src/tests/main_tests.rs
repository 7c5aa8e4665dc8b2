use super::*;

#[test]
fn field_pairs_split_on_first_equals() {
    assert_eq!(
        parse_field("amount=42.50").expect("pair"),
        ("amount".to_string(), "42.50".to_string())
    );
    assert_eq!(
        parse_field("image_url=/a.png?v=2").expect("pair"),
        ("image_url".to_string(), "/a.png?v=2".to_string())
    );
    assert_eq!(
        parse_field("name=").expect("pair"),
        ("name".to_string(), String::new())
    );
    assert!(parse_field("amount").is_err());
    assert!(parse_field("=5").is_err());
}

#[test]
fn repeated_fields_build_one_form() {
    let cli = Cli::try_parse_from([
        "admin",
        "invoices",
        "create",
        "--field",
        "customerId=c1",
        "--field",
        "amount=42.50",
        "--field",
        "status=pending",
    ])
    .expect("parse");

    let Command::Invoices(ResourceCommand::Create(form)) = cli.command else {
        panic!("unexpected command");
    };
    let form = form.to_form();
    assert_eq!(form.get("customerId"), Some("c1"));
    assert_eq!(form.get("amount"), Some("42.50"));
    assert_eq!(form.get("status"), Some("pending"));
}

#[test]
fn update_takes_id_and_fields() {
    let cli = Cli::try_parse_from([
        "admin",
        "--api-base-url",
        "http://api:9000",
        "customers",
        "update",
        "c7",
        "--field",
        "name=Amy",
    ])
    .expect("parse");

    assert_eq!(cli.api_base_url.as_deref(), Some("http://api:9000"));
    assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    match cli.command {
        Command::Customers(CustomerCommand::Resource(ResourceCommand::Update { id, form })) => {
            assert_eq!(id, "c7");
            assert_eq!(form.to_form().get("name"), Some("Amy"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn list_defaults_to_first_page_without_query() {
    let cli = Cli::try_parse_from(["admin", "invoices", "list"]).expect("parse");
    match cli.command {
        Command::Invoices(ResourceCommand::List { query, page }) => {
            assert_eq!(query, "");
            assert_eq!(page, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn failed_operation_exits_non_zero() {
    let failed = OperationResult::failed(
        shared::error::ErrorCode::NotFound,
        "Invoice not found.",
        None,
    );
    assert_eq!(report(failed).expect("report"), ExitCode::FAILURE);
    assert_eq!(
        report(OperationResult::succeeded("Invoice deleted successfully")).expect("report"),
        ExitCode::SUCCESS
    );
}

#[test]
fn listing_all_is_a_customers_only_command() {
    let cli = Cli::try_parse_from(["admin", "customers", "all"]).expect("parse");
    assert!(matches!(cli.command, Command::Customers(CustomerCommand::All)));

    assert!(Cli::try_parse_from(["admin", "invoices", "all"]).is_err());
}

#[test]
fn customers_keep_the_shared_resource_commands() {
    let cli = Cli::try_parse_from(["admin", "customers", "show", "c1"]).expect("parse");
    match cli.command {
        Command::Customers(CustomerCommand::Resource(ResourceCommand::Show { id })) => {
            assert_eq!(id, "c1");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
