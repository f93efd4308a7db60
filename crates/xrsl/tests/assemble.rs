//! Integration tests for writing job descriptions back out as xRSL.

use xrsl::job::{Notification, OutputFile};
use xrsl::{Dialect, JobDescription, JobDescriptionParser, ParseStatus};

fn parser(dialect: Dialect) -> JobDescriptionParser {
    JobDescriptionParser::builder().dialect(dialect).build()
}

fn parse_one(dialect: Dialect, source: &str) -> JobDescription {
    let mut jobs = parser(dialect).parse(source).unwrap();
    assert_eq!(jobs.len(), 1);
    jobs.remove(0)
}

/// Parse without keeping the recorded request text.
fn parse_bare(dialect: Dialect, source: &str) -> JobDescription {
    let mut job = parse_one(dialect, source);
    job.other_attributes.clear();
    job
}

fn runnable() -> JobDescription {
    let mut job = JobDescription::new();
    job.application.executable.path = "run".to_string();
    job
}

// =============================================================================
// Output form
// =============================================================================

#[test]
fn client_output() {
    let job = parse_bare(
        Dialect::Client,
        r#"&(executable="/bin/echo")(arguments="hello")(stdout=out)(join=yes)(cputime=10)(memory=1024)(queue=short)"#,
    );
    insta::assert_snapshot!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        @r#"&(executable = "/bin/echo")(arguments = "hello")(stdout = "out")(join = "yes")(cputime = "10")(memory = "1024")(queue = "short")"#
    );
}

#[test]
fn service_side_output() {
    let job = parse_bare(
        Dialect::Client,
        r#"&(executable="/bin/echo")(stdout=out)(join=yes)(cputime=10)"#,
    );
    insta::assert_snapshot!(
        parser(Dialect::GridManager).assemble(&job).unwrap(),
        @r#"&(executable = "/bin/echo")(stdout = "out")(stderr = "out")(cputime = "600")"#
    );
}

#[test]
fn data_staging_output() {
    let job = parse_bare(
        Dialect::Client,
        r#"&(executable=run)(inputfiles=(in1 "") (in2 "gsiftp://host/in2" "threads=4" "location=gsiftp://mirror/in2"))(executables=in1)(outputfiles=(out "") (res "gsiftp://host/res"))"#,
    );
    insta::assert_snapshot!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        @r#"&(executable = "run")(inputfiles = ("in1" "") ("in2" "gsiftp://host/in2" "threads=4" "location=gsiftp://mirror/in2"))(executables = "in1")(outputfiles = ("out" "") ("res" "gsiftp://host/res"))"#
    );
}

#[test]
fn uploaded_file_sizes_are_kept_on_the_service_side() {
    let job = parse_bare(Dialect::GridManager, r#"&(executable=run)(inputfiles=(in "1024"))"#);
    assert_eq!(
        parser(Dialect::GridManager).assemble(&job).unwrap(),
        r#"&(executable = "run")(inputfiles = ("in" "1024"))"#
    );
}

#[test]
fn benchmark_output() {
    let job = parse_bare(
        Dialect::Client,
        "&(executable=run)(benchmarks=(specint2000 1500 60))",
    );
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(benchmarks = ("specint2000" "1500" "60"))"#
    );
}

#[test]
fn software_requirements_output() {
    let job = parse_bare(
        Dialect::Client,
        r#"&(executable=run)(runtimeenvironment>="APPS/HEP/ATLAS-21.0" "opt1")(opsys!=linux)"#,
    );
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(runtimeenvironment >= "APPS/HEP/ATLAS-21.0" "opt1")(opsys != "linux")"#
    );
}

#[test]
fn time_units_follow_the_dialect() {
    let mut job = runnable();
    job.resources.total_cpu_time.range.max = Some(90);
    job.resources.individual_wall_time.range.max = Some(7200);
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(cputime = "90s")(walltime = "120")"#
    );
    assert_eq!(
        parser(Dialect::GridManager).assemble(&job).unwrap(),
        r#"&(executable = "run")(cputime = "90")(walltime = "7200")"#
    );
}

#[test]
fn gridtime_is_recognized() {
    let job = parse_bare(Dialect::Client, "&(executable=run)(gridtime=10)(count=2)");
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(gridtime = "10")(count = "2")"#
    );
}

#[test]
fn side_table_entries() {
    let mut job = runnable();
    job.set_other_attribute("nordugrid:xrsl", "action", "cancel");
    job.set_other_attribute("nordugrid:xrsl", "jobid", "1");
    job.set_other_attribute("other:language", "foo", "bar");
    job.set_other_attribute("nordugrid:broker", "reject_queue", "long");
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(jobid = "1")"#
    );
    assert_eq!(
        parser(Dialect::GridManager).assemble(&job).unwrap(),
        r#"&(executable = "run")(action = "cancel")(jobid = "1")"#
    );
}

#[test]
fn rejected_queues_are_not_written_back() {
    let job = parse_one(Dialect::Client, r#"&(executable="executable")(|(queue!=q1)(queue!=q2))"#);
    assert_eq!(job.other_attribute("nordugrid:broker", "reject_queue"), Some("q1"));
    assert_eq!(
        job.alternatives()[0].other_attribute("nordugrid:broker", "reject_queue"),
        Some("q2")
    );

    let text = parser(Dialect::Client).assemble(&job).unwrap();
    let reparsed = parse_one(Dialect::Client, &text);
    assert_eq!(reparsed.other_attribute("nordugrid:broker", "reject_queue"), None);
    assert!(!reparsed.has_alternatives());
}

#[test]
fn replica_options_follow_their_location() {
    let job = parse_bare(
        Dialect::Client,
        r#"&(executable=run)(outputfiles=("out1" "lfc://example.com/in1" "checksum=md5" "location=gsiftp://example.com/in1" "threads=5" "location=gsiftp://example2.com/in1" "threads=10"))"#,
    );
    insta::assert_snapshot!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        @r#"&(executable = "run")(outputfiles = ("out1" "lfc://example.com/in1" "checksum=md5" "location=gsiftp://example.com/in1" "threads=5" "location=gsiftp://example2.com/in1" "threads=10"))"#
    );
}

#[test]
fn alternatives_are_not_written() {
    let job = parse_bare(Dialect::Client, "&(executable=run)(|(queue=a)(queue=b))");
    assert_eq!(
        parser(Dialect::Client).assemble(&job).unwrap(),
        r#"&(executable = "run")(queue = "a")"#
    );
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn parse_assemble_parse_keeps_every_field() {
    let sources = [
        r#"&(executable="/bin/echo")(arguments="a b" "it's")"#,
        "&(executable=run)(stdin=in)(stdout=out)(stderr=err)",
        r#"&(executable=run)(inputfiles=(a "gsiftp://h/a") (b ""))(cache=yes)"#,
        r#"&(executable=run)(inputfiles=(a "lfc://h/a" "location=gsiftp://h/a" "threads=5"))"#,
        "&(executable=run)(queue=short)",
        r#"&(executable=run)(ftpthreads=4)(inputfiles=(a "gsiftp://h/a"))(outputfiles=(o "gsiftp://h/o"))"#,
        r#"&(executable=run)(notify="bqfedc someone@example.com" "other@example.com")"#,
        "&(executable=run)(dryrun=yes)",
        "&(executable=run)(stdout=out)(join=yes)",
        "&(executable=run)(gridtime=10)(count=2)",
        "&(executable=run)(cputime=90s)(walltime=2h)(lifetime=2)",
        "&(executable=run)(benchmarks=(specint2000 1500 60))",
        r#"&(executable=run)(runtimeenvironment>="APPS/HEP/ATLAS-21.0" "opt1")(middleware=nordugrid-arc-6.0)"#,
        "&(executable=run)(environment=(A 1) (B 2))(nodeaccess=inbound)(exclusiveexecution=no)",
        "&(executable=run)(count=4)(countpernode=2)(memory=100)(disk=10)(architecture=x86_64)",
        r#"&(executable=run)(priority=10)(rerun=2)(starttime="2024-01-01")(gmlog=log)(jobname=j)(acl="<acl/>")"#,
        "&(executable=run)(jobreport=https://log.example.org)(credentialserver=myproxy://px.example.org)",
        r#"&(executable=run)(inputfiles=(run.sh "") (data ""))(executables=run.sh)"#,
    ];
    for source in sources {
        let first = parse_one(Dialect::Client, source);
        let text = parser(Dialect::Client).assemble(&first).unwrap();
        let second = parse_one(Dialect::Client, &text);
        assert_eq!(first, second, "source {source}\nassembled {text}");
    }
}

#[test]
fn service_side_round_trip() {
    let source = r#"&(executable=run)(action=request)(inputfiles=(in "2048"))(cputime=90)(savestate=yes)"#;
    let first = parse_one(Dialect::GridManager, source);
    let text = parser(Dialect::GridManager).assemble(&first).unwrap();
    let second = parse_one(Dialect::GridManager, &text);
    assert_eq!(first, second, "assembled {text}");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn empty_output_file_name_fails() {
    let mut job = runnable();
    job.data_staging.output_files.push(OutputFile::default());
    let diagnostics = parser(Dialect::Client).assemble(&job).unwrap_err();
    assert_eq!(diagnostics.status(), ParseStatus::Failure);
    assert!(diagnostics.mentions("an output file has an empty name"));
}

#[test]
fn missing_executable_fails() {
    let diagnostics = parser(Dialect::Client)
        .assemble(&JobDescription::new())
        .unwrap_err();
    assert!(diagnostics.mentions("no executable given"));
}

#[test]
fn slots_per_host_needs_slot_count() {
    let mut job = runnable();
    job.resources.slot_requirement.slots_per_host = Some(2);
    let diagnostics = parser(Dialect::Client).assemble(&job).unwrap_err();
    assert!(diagnostics.mentions("slots per host is set without a number of slots"));
}

#[test]
fn notification_without_states_fails() {
    let mut job = runnable();
    job.application.notifications.push(Notification {
        email: "user@example.org".to_string(),
        states: Vec::new(),
    });
    let diagnostics = parser(Dialect::Client).assemble(&job).unwrap_err();
    assert!(diagnostics.mentions("notification for user@example.org has no states"));
}

#[test]
fn other_languages_are_refused() {
    let diagnostics = xrsl::assemble(&runnable(), "emies:adl", "").unwrap_err();
    assert_eq!(diagnostics.status(), ParseStatus::WrongLanguage);
    assert!(diagnostics.mentions("language 'emies:adl' is not supported"));
}
