//! WS-Addressing header validation.
//!
//! Each direction runs a fixed, ordered list of independent rules against the
//! SOAP header. Every rule appends its violations to a report created for that
//! call alone, so one validator can be shared between threads and exchanges.

use crate::config::WsaAssertionConfig;
use crate::error::{AssertionFailure, Violation, ViolationCode, WsaError};
use crate::exchange::{AnonymousPolicy, MessageExchange, Operation};
use crate::parser::{header_element, parse_document, Element};
use crate::version::{resolve_version, AddressKind, AddressingVersion};
use crate::wsdl::{default_action, fault_to_ref_params, reply_to_ref_params, request_message_id};
use tracing::{debug, warn};

/// Result of one WS-Addressing validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Violations found, in the order the rules ran
    violations: Vec<Violation>,
    /// WS-Addressing version the message was validated against
    pub version: Option<AddressingVersion>,
}

impl ValidationReport {
    /// Check if any violations were found.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// All violation messages joined by a single space.
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Collapse the report into a single pass/fail result.
    pub fn into_result(self) -> Result<(), AssertionFailure> {
        if self.violations.is_empty() {
            return Ok(());
        }
        Err(AssertionFailure {
            message: self.message(),
            violations: self.violations,
        })
    }

    fn failed(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
            version: None,
        }
    }
}

/// Everything a rule may look at.
struct RuleContext<'a> {
    /// Header of the message being validated
    header: &'a Element,
    version: AddressingVersion,
    operation: &'a Operation,
    config: &'a WsaAssertionConfig,
    /// Header of the request, used by response correlation rules
    request_header: Option<&'a Element>,
}

impl RuleContext<'_> {
    fn ns(&self) -> &'static str {
        self.version.namespace()
    }
}

type Rule = fn(&RuleContext<'_>, &mut ValidationReport);

const REQUEST_RULES: &[Rule] = &[
    check_action_present,
    check_to,
    check_fault_to_anonymous,
    check_message_id,
    check_reply_to_required,
];

const RESPONSE_RULES: &[Rule] = &[
    check_action_matches_default,
    check_to,
    check_fault_to_anonymous,
    check_relates_to,
    check_reply_to_anonymous,
    check_reply_to_ref_params,
    check_fault_to_ref_params,
];

/// WS-Addressing header validator.
#[derive(Debug, Clone, Default)]
pub struct WsaValidator {
    config: WsaAssertionConfig,
}

impl WsaValidator {
    /// Create a new validator with configuration.
    pub fn new(config: WsaAssertionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WsaAssertionConfig {
        &self.config
    }

    /// Validate the WS-Addressing headers of the exchange's request.
    pub fn validate_request(
        &self,
        exchange: &MessageExchange<'_>,
    ) -> Result<ValidationReport, WsaError> {
        let operation = exchange.operation();
        let soap_version = operation.soap_version;
        debug!(operation = %operation.name, "Validating WS-A request headers");

        let doc = parse_document(exchange.request_content())?;
        let version = resolve_version(&doc, soap_version)?;
        let (Some(version), Some(header)) = (version, header_element(&doc, soap_version)?) else {
            warn!(operation = %operation.name, "WS-A not enabled on request");
            return Ok(ValidationReport::failed(Violation::new(
                ViolationCode::WsaNotEnabled,
                "WS-A not enabled",
            )));
        };

        let ctx = RuleContext {
            header,
            version,
            operation,
            config: &self.config,
            request_header: Some(header),
        };
        Ok(self.run_rules("request", &ctx, REQUEST_RULES))
    }

    /// Validate the WS-Addressing headers of the exchange's response against
    /// its request.
    pub fn validate_response(
        &self,
        exchange: &MessageExchange<'_>,
    ) -> Result<ValidationReport, WsaError> {
        let operation = exchange.operation();
        let soap_version = operation.soap_version;
        debug!(operation = %operation.name, "Validating WS-A response headers");

        let response_doc = parse_document(exchange.response_content()?)?;
        let request_doc = parse_document(exchange.request_content())?;
        let response_version = resolve_version(&response_doc, soap_version)?;
        let request_version = resolve_version(&request_doc, soap_version)?;

        let (Some(version), Some(header)) =
            (response_version, header_element(&response_doc, soap_version)?)
        else {
            warn!(operation = %operation.name, "WS-A not enabled on response");
            return Ok(ValidationReport::failed(Violation::new(
                ViolationCode::WsaNotEnabled,
                "WS-A not enabled.",
            )));
        };

        if request_version != Some(version) {
            warn!(
                operation = %operation.name,
                request = ?request_version,
                response = ?version,
                "WS-A version differs between request and response"
            );
            return Ok(ValidationReport::failed(Violation::new(
                ViolationCode::VersionMismatch,
                "Response has the wrong ws-a version namespace value.",
            )));
        }

        let ctx = RuleContext {
            header,
            version,
            operation,
            config: &self.config,
            request_header: header_element(&request_doc, soap_version)?,
        };
        Ok(self.run_rules("response", &ctx, RESPONSE_RULES))
    }

    fn run_rules(&self, side: &str, ctx: &RuleContext<'_>, rules: &[Rule]) -> ValidationReport {
        let mut report = ValidationReport {
            violations: Vec::new(),
            version: Some(ctx.version),
        };
        for rule in rules {
            rule(ctx, &mut report);
        }

        if report.has_violations() {
            warn!(
                operation = %ctx.operation.name,
                side,
                violations = report.violations.len(),
                "WS-A validation failed"
            );
        } else {
            debug!(operation = %ctx.operation.name, side, "WS-A validation passed");
        }
        report
    }
}

/// Check an endpoint address against the operation's anonymous policy.
///
/// `field` names the header entry the address came from and appears in the
/// violation message.
pub fn anonymous_policy_violation(
    field: &str,
    address: &str,
    version: AddressingVersion,
    policy: AnonymousPolicy,
) -> Option<Violation> {
    match (policy, version.address_kind(address)) {
        (AnonymousPolicy::Prohibited, AddressKind::Anonymous) => Some(Violation::with_location(
            ViolationCode::AnonymousProhibited,
            format!(
                "WS-A InvalidAddressingHeader {} , Anonymous addresses are prohibited.",
                field
            ),
            field,
        )),
        (AnonymousPolicy::Required, AddressKind::Ordinary) => Some(Violation::with_location(
            ViolationCode::AnonymousRequired,
            format!(
                "WS-A InvalidAddressingHeader {} , Anonymous addresses are required.",
                field
            ),
            field,
        )),
        _ => None,
    }
}

/// Text of a mandatory child element.
///
/// An absent element is reported as not specified and is not also reported
/// as empty.
fn required_text<'a>(
    parent: &'a Element,
    ns: &str,
    local_name: &str,
    label: &str,
) -> Result<&'a str, Violation> {
    let element = parent.first_child_ns(ns, local_name).ok_or_else(|| {
        Violation::with_location(
            ViolationCode::MissingProperty,
            format!("WS-A {} property is not specified.", label),
            label,
        )
    })?;

    match element.text() {
        "" => Err(Violation::with_location(
            ViolationCode::EmptyProperty,
            format!("WS-A {} property is empty.", label),
            label,
        )),
        text => Ok(text),
    }
}

/// Non-empty `Address` of an optional endpoint reference header entry.
fn endpoint_address<'a>(header: &'a Element, ns: &str, endpoint: &str) -> Option<&'a str> {
    header
        .first_child_ns(ns, endpoint)?
        .first_child_ns(ns, "Address")
        .map(Element::text)
        .filter(|address| !address.is_empty())
}

fn check_endpoint_anonymous(ctx: &RuleContext<'_>, report: &mut ValidationReport, endpoint: &str) {
    if let Some(address) = endpoint_address(ctx.header, ctx.ns(), endpoint) {
        if let Some(v) =
            anonymous_policy_violation(endpoint, address, ctx.version, ctx.operation.anonymous)
        {
            report.add_violation(v);
        }
    }
}

fn check_action_present(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.config.assert_action {
        return;
    }
    if let Err(v) = required_text(ctx.header, ctx.ns(), "Action", "Action") {
        report.add_violation(v);
    }
}

fn check_action_matches_default(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.config.assert_action {
        return;
    }
    match required_text(ctx.header, ctx.ns(), "Action", "Action") {
        Err(v) => report.add_violation(v),
        Ok(action) => {
            let expected = default_action(ctx.operation, true);
            if action != expected {
                report.add_violation(Violation::with_location(
                    ViolationCode::ActionMismatch,
                    format!("WS-A Action property should be {}.", expected),
                    "Action",
                ));
            }
        }
    }
}

fn check_to(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.config.assert_to {
        return;
    }
    match required_text(ctx.header, ctx.ns(), "To", "To") {
        Err(v) => report.add_violation(v),
        // only the prohibited half of the anonymous policy applies to To
        Ok(to) if ctx.operation.anonymous == AnonymousPolicy::Prohibited => {
            if let Some(v) =
                anonymous_policy_violation("To", to, ctx.version, AnonymousPolicy::Prohibited)
            {
                report.add_violation(v);
            }
        }
        Ok(_) => {}
    }
}

fn check_fault_to_anonymous(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    check_endpoint_anonymous(ctx, report, "FaultTo");
}

fn check_message_id(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.operation.is_request_response() {
        return;
    }
    if let Err(v) = required_text(ctx.header, ctx.ns(), "MessageID", "MessageID") {
        report.add_violation(v);
    }
}

fn check_reply_to_required(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.operation.is_request_response() {
        return;
    }
    let Some(reply_to) = ctx.header.first_child_ns(ctx.ns(), "ReplyTo") else {
        report.add_violation(Violation::with_location(
            ViolationCode::MissingProperty,
            "WS-A ReplyTo property is not specified.",
            "ReplyTo",
        ));
        return;
    };

    match required_text(reply_to, ctx.ns(), "Address", "ReplyTo Address") {
        Err(v) => report.add_violation(v),
        Ok(address) => {
            if let Some(v) = anonymous_policy_violation(
                "ReplyTo",
                address,
                ctx.version,
                ctx.operation.anonymous,
            ) {
                report.add_violation(v);
            }
        }
    }
}

fn check_reply_to_anonymous(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    check_endpoint_anonymous(ctx, report, "ReplyTo");
}

fn check_relates_to(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if !ctx.config.assert_relates_to {
        return;
    }
    match required_text(ctx.header, ctx.ns(), "RelatesTo", "RelatesTo") {
        Err(v) => report.add_violation(v),
        Ok(relates_to) => {
            let request_id = request_message_id(ctx.request_header, ctx.version);
            if request_id != Some(relates_to) {
                report.add_violation(Violation::with_location(
                    ViolationCode::RelatesToMismatch,
                    "WS-A RelatesTo property is not equal to request wsa:MessageId.",
                    "RelatesTo",
                ));
            }
        }
    }
}

type RefParamLookup = for<'a> fn(&'a Element, AddressingVersion) -> Vec<&'a Element>;

/// Every reference parameter of a request endpoint must be echoed as a direct
/// child of the response header.
fn check_echoed_ref_params(
    ctx: &RuleContext<'_>,
    report: &mut ValidationReport,
    lookup: RefParamLookup,
) {
    let Some(request_header) = ctx.request_header else {
        return;
    };
    for param in lookup(request_header, ctx.version) {
        let name = param.local_name.as_str();
        if ctx.header.children_named(name).next().is_none() {
            report.add_violation(Violation::with_location(
                ViolationCode::MissingReferenceParameter,
                format!("Response does not have request ReferenceProperty {}.", name),
                name,
            ));
        }
    }
}

fn check_reply_to_ref_params(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if ctx.config.assert_reply_to_ref_params {
        check_echoed_ref_params(ctx, report, reply_to_ref_params);
    }
}

fn check_fault_to_ref_params(ctx: &RuleContext<'_>, report: &mut ValidationReport) {
    if ctx.config.assert_fault_to_ref_params {
        check_echoed_ref_params(ctx, report, fault_to_ref_params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Mep;
    use crate::version::{WSA_200408_NS, WSA_200508_NS};

    const ANON_2005: &str = "http://www.w3.org/2005/08/addressing/anonymous";
    const NONE_2005: &str = "http://www.w3.org/2005/08/addressing/none";

    fn envelope(wsa_ns: &str, header: &str) -> String {
        format!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header xmlns:wsa="{}">
{}
  </soap:Header>
  <soap:Body><m:GetQuote xmlns:m="http://example.org/stock"/></soap:Body>
</soap:Envelope>"#,
            wsa_ns, header
        )
    }

    fn operation(mep: Mep) -> Operation {
        Operation {
            target_namespace: "http://example.org/stock".to_string(),
            port_type: "StockQuotePortType".to_string(),
            ..Operation::new("GetQuote", mep)
        }
    }

    fn valid_request_header() -> String {
        r#"    <wsa:Action>http://example.org/stock/StockQuotePortType/GetQuoteRequest</wsa:Action>
    <wsa:To>http://example.org/stock</wsa:To>
    <wsa:MessageID>urn:uuid:req-1</wsa:MessageID>
    <wsa:ReplyTo><wsa:Address>http://example.org/callback</wsa:Address></wsa:ReplyTo>"#
            .to_string()
    }

    fn validate_request(config: WsaAssertionConfig, op: &Operation, header: &str) -> ValidationReport {
        let request = envelope(WSA_200508_NS, header);
        let exchange = MessageExchange::new(op, &request);
        WsaValidator::new(config).validate_request(&exchange).unwrap()
    }

    fn validate_response(
        config: WsaAssertionConfig,
        op: &Operation,
        request_header: &str,
        response_header: &str,
    ) -> ValidationReport {
        let request = envelope(WSA_200508_NS, request_header);
        let response = envelope(WSA_200508_NS, response_header);
        let exchange = MessageExchange::new(op, &request).with_response(&response);
        WsaValidator::new(config).validate_response(&exchange).unwrap()
    }

    fn codes(report: &ValidationReport) -> Vec<ViolationCode> {
        report.violations().iter().map(|v| v.code).collect()
    }

    // --- Anonymous policy ---

    #[test]
    fn test_anonymous_policy_prohibited() {
        let v = anonymous_policy_violation(
            "ReplyTo",
            ANON_2005,
            AddressingVersion::V200508,
            AnonymousPolicy::Prohibited,
        )
        .unwrap();
        assert_eq!(v.code, ViolationCode::AnonymousProhibited);
        assert_eq!(
            v.message,
            "WS-A InvalidAddressingHeader ReplyTo , Anonymous addresses are prohibited."
        );

        assert!(anonymous_policy_violation(
            "ReplyTo",
            "http://example.org/callback",
            AddressingVersion::V200508,
            AnonymousPolicy::Prohibited,
        )
        .is_none());
    }

    #[test]
    fn test_anonymous_policy_required() {
        let v = anonymous_policy_violation(
            "FaultTo",
            "http://example.org/faults",
            AddressingVersion::V200508,
            AnonymousPolicy::Required,
        )
        .unwrap();
        assert_eq!(v.code, ViolationCode::AnonymousRequired);
        assert_eq!(v.location.as_deref(), Some("FaultTo"));

        for address in [ANON_2005, NONE_2005] {
            assert!(anonymous_policy_violation(
                "FaultTo",
                address,
                AddressingVersion::V200508,
                AnonymousPolicy::Required,
            )
            .is_none());
        }
    }

    #[test]
    fn test_anonymous_policy_optional() {
        for address in [ANON_2005, NONE_2005, "http://example.org/callback"] {
            assert!(anonymous_policy_violation(
                "ReplyTo",
                address,
                AddressingVersion::V200508,
                AnonymousPolicy::Optional,
            )
            .is_none());
        }
    }

    // --- Request path ---

    #[test]
    fn test_valid_request() {
        let config = WsaAssertionConfig {
            assert_to: true,
            ..Default::default()
        };
        let report = validate_request(config, &operation(Mep::RequestResponse), &valid_request_header());
        assert!(report.is_success(), "unexpected: {}", report.message());
        assert_eq!(report.version, Some(AddressingVersion::V200508));
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_request_without_wsa() {
        let op = operation(Mep::RequestResponse);
        let request = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header/>
  <soap:Body/>
</soap:Envelope>"#;
        let exchange = MessageExchange::new(&op, request);
        let report = WsaValidator::default().validate_request(&exchange).unwrap();
        assert_eq!(report.message(), "WS-A not enabled");
        assert_eq!(codes(&report), vec![ViolationCode::WsaNotEnabled]);
        assert_eq!(report.version, None);
    }

    #[test]
    fn test_request_missing_action_and_message_id_accumulate() {
        let header = r#"    <wsa:ReplyTo><wsa:Address>http://example.org/callback</wsa:Address></wsa:ReplyTo>"#;
        let report = validate_request(
            WsaAssertionConfig::default(),
            &operation(Mep::RequestResponse),
            header,
        );
        assert_eq!(
            report.message(),
            "WS-A Action property is not specified. WS-A MessageID property is not specified."
        );
        let failure = report.into_result().unwrap_err();
        assert_eq!(failure.violations.len(), 2);
    }

    #[test]
    fn test_request_empty_action_reports_empty_only() {
        let header = r#"    <wsa:Action>   </wsa:Action>"#;
        let report = validate_request(WsaAssertionConfig::default(), &operation(Mep::OneWay), header);
        assert_eq!(codes(&report), vec![ViolationCode::EmptyProperty]);
        assert_eq!(report.message(), "WS-A Action property is empty.");
    }

    #[test]
    fn test_request_action_not_checked_when_disabled() {
        let header = r#"    <wsa:To>http://example.org/stock</wsa:To>"#;
        let config = WsaAssertionConfig {
            assert_action: false,
            ..Default::default()
        };
        let report = validate_request(config, &operation(Mep::OneWay), header);
        assert!(report.is_success());
    }

    #[test]
    fn test_one_way_request_skips_reply_fields() {
        let header = r#"    <wsa:Action>urn:notify</wsa:Action>"#;
        let report = validate_request(WsaAssertionConfig::default(), &operation(Mep::OneWay), header);
        assert!(report.is_success());
    }

    #[test]
    fn test_request_missing_reply_to() {
        let header = r#"    <wsa:Action>urn:a</wsa:Action>
    <wsa:MessageID>urn:uuid:1</wsa:MessageID>"#;
        let report = validate_request(
            WsaAssertionConfig::default(),
            &operation(Mep::RequestResponse),
            header,
        );
        assert_eq!(report.message(), "WS-A ReplyTo property is not specified.");
    }

    #[test]
    fn test_request_reply_to_without_address() {
        let header = r#"    <wsa:Action>urn:a</wsa:Action>
    <wsa:MessageID>urn:uuid:1</wsa:MessageID>
    <wsa:ReplyTo/>"#;
        let report = validate_request(
            WsaAssertionConfig::default(),
            &operation(Mep::RequestResponse),
            header,
        );
        assert_eq!(report.message(), "WS-A ReplyTo Address property is not specified.");

        let header = r#"    <wsa:Action>urn:a</wsa:Action>
    <wsa:MessageID>urn:uuid:1</wsa:MessageID>
    <wsa:ReplyTo><wsa:Address/></wsa:ReplyTo>"#;
        let report = validate_request(
            WsaAssertionConfig::default(),
            &operation(Mep::RequestResponse),
            header,
        );
        assert_eq!(report.message(), "WS-A ReplyTo Address property is empty.");
    }

    #[test]
    fn test_request_reply_to_anonymous_prohibited() {
        let header = format!(
            r#"    <wsa:Action>urn:a</wsa:Action>
    <wsa:MessageID>urn:uuid:1</wsa:MessageID>
    <wsa:ReplyTo><wsa:Address>{}</wsa:Address></wsa:ReplyTo>"#,
            ANON_2005
        );
        let mut op = operation(Mep::RequestResponse);
        op.anonymous = AnonymousPolicy::Prohibited;
        let report = validate_request(WsaAssertionConfig::default(), &op, &header);
        assert_eq!(codes(&report), vec![ViolationCode::AnonymousProhibited]);

        op.anonymous = AnonymousPolicy::Optional;
        let report = validate_request(WsaAssertionConfig::default(), &op, &header);
        assert!(report.is_success());
    }

    #[test]
    fn test_request_reply_to_anonymous_required() {
        let mut op = operation(Mep::RequestResponse);
        op.anonymous = AnonymousPolicy::Required;
        let report = validate_request(WsaAssertionConfig::default(), &op, &valid_request_header());
        assert_eq!(
            report.message(),
            "WS-A InvalidAddressingHeader ReplyTo , Anonymous addresses are required."
        );
    }

    #[test]
    fn test_to_checks() {
        let config = WsaAssertionConfig {
            assert_to: true,
            ..Default::default()
        };
        let report = validate_request(config.clone(), &operation(Mep::OneWay), "    <wsa:Action>urn:a</wsa:Action>");
        assert_eq!(report.message(), "WS-A To property is not specified.");

        let header = format!(
            "    <wsa:Action>urn:a</wsa:Action>\n    <wsa:To>{}</wsa:To>",
            ANON_2005
        );
        let mut op = operation(Mep::OneWay);
        op.anonymous = AnonymousPolicy::Prohibited;
        let report = validate_request(config.clone(), &op, &header);
        assert_eq!(
            report.message(),
            "WS-A InvalidAddressingHeader To , Anonymous addresses are prohibited."
        );

        // To never triggers the "required" half of the policy
        op.anonymous = AnonymousPolicy::Required;
        let header = "    <wsa:Action>urn:a</wsa:Action>\n    <wsa:To>http://example.org/x</wsa:To>";
        let report = validate_request(config, &op, header);
        assert!(report.is_success());
    }

    #[test]
    fn test_fault_to_anonymous_checked_without_toggle() {
        let header = format!(
            r#"    <wsa:Action>urn:a</wsa:Action>
    <wsa:FaultTo><wsa:Address>{}</wsa:Address></wsa:FaultTo>"#,
            ANON_2005
        );
        let mut op = operation(Mep::OneWay);
        op.anonymous = AnonymousPolicy::Prohibited;
        let report = validate_request(WsaAssertionConfig::default(), &op, &header);
        assert_eq!(
            report.message(),
            "WS-A InvalidAddressingHeader FaultTo , Anonymous addresses are prohibited."
        );
    }

    #[test]
    fn test_wrong_namespace_elements_are_missing() {
        // Action declared in the submission namespace while 2005/08 is resolved
        let header = format!(
            r#"    <old:Action xmlns:old="{}">urn:a</old:Action>"#,
            WSA_200408_NS
        );
        let report = validate_request(WsaAssertionConfig::default(), &operation(Mep::OneWay), &header);
        assert_eq!(report.message(), "WS-A Action property is not specified.");
    }

    #[test]
    fn test_request_validation_is_repeatable() {
        let op = operation(Mep::RequestResponse);
        let request = envelope(WSA_200508_NS, "    <wsa:To>x</wsa:To>");
        let exchange = MessageExchange::new(&op, &request);
        let validator = WsaValidator::new(WsaAssertionConfig::default());
        let first = validator.validate_request(&exchange).unwrap();
        let second = validator.validate_request(&exchange).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.message(), second.message());
        assert_eq!(first.violations().len(), 3);
    }

    #[test]
    fn test_request_malformed_xml_is_error() {
        let op = operation(Mep::RequestResponse);
        let exchange = MessageExchange::new(&op, "<soap:Envelope xmlns:soap=\"x\"><oops>");
        let result = WsaValidator::default().validate_request(&exchange);
        assert!(matches!(result, Err(WsaError::XmlParse(_))));
    }

    // --- Response path ---

    fn valid_response_header() -> String {
        r#"    <wsa:Action>http://example.org/stock/StockQuotePortType/GetQuoteResponse</wsa:Action>
    <wsa:To>http://example.org/callback</wsa:To>
    <wsa:RelatesTo>urn:uuid:req-1</wsa:RelatesTo>"#
            .to_string()
    }

    #[test]
    fn test_valid_response() {
        let config = WsaAssertionConfig {
            assert_to: true,
            assert_relates_to: true,
            ..Default::default()
        };
        let report = validate_response(
            config,
            &operation(Mep::RequestResponse),
            &valid_request_header(),
            &valid_response_header(),
        );
        assert!(report.is_success(), "unexpected: {}", report.message());
    }

    #[test]
    fn test_response_without_wsa() {
        let op = operation(Mep::RequestResponse);
        let request = envelope(WSA_200508_NS, &valid_request_header());
        let response = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body/>
</soap:Envelope>"#;
        let exchange = MessageExchange::new(&op, &request).with_response(response);
        let report = WsaValidator::default().validate_response(&exchange).unwrap();
        assert_eq!(report.message(), "WS-A not enabled.");
    }

    #[test]
    fn test_response_with_entry_level_wsa_only() {
        let op = operation(Mep::RequestResponse);
        let request = envelope(WSA_200508_NS, &valid_request_header());
        let response = format!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header>
    <a:Action xmlns:a="{}">urn:a</a:Action>
  </soap:Header>
  <soap:Body/>
</soap:Envelope>"#,
            WSA_200508_NS
        );
        let exchange = MessageExchange::new(&op, &request).with_response(&response);
        let report = WsaValidator::default().validate_response(&exchange).unwrap();
        assert_eq!(report.message(), "WS-A not enabled.");
        assert_eq!(report.version, None);
    }

    #[test]
    fn test_response_version_mismatch_short_circuits() {
        let op = operation(Mep::RequestResponse);
        let request = envelope(WSA_200408_NS, "    <wsa:Action>urn:a</wsa:Action>");
        // would otherwise fail Action and RelatesTo
        let response = envelope(WSA_200508_NS, "    <wsa:To>x</wsa:To>");
        let exchange = MessageExchange::new(&op, &request).with_response(&response);
        let config = WsaAssertionConfig {
            assert_relates_to: true,
            ..Default::default()
        };
        let report = WsaValidator::new(config).validate_response(&exchange).unwrap();
        assert_eq!(
            report.message(),
            "Response has the wrong ws-a version namespace value."
        );
        assert_eq!(codes(&report), vec![ViolationCode::VersionMismatch]);
    }

    #[test]
    fn test_response_without_response_content_is_error() {
        let op = operation(Mep::RequestResponse);
        let request = envelope(WSA_200508_NS, &valid_request_header());
        let exchange = MessageExchange::new(&op, &request);
        let result = WsaValidator::default().validate_response(&exchange);
        assert!(matches!(result, Err(WsaError::MissingResponse)));
    }

    #[test]
    fn test_response_action_mismatch() {
        let header = "    <wsa:Action>urn:wrong</wsa:Action>";
        let report = validate_response(
            WsaAssertionConfig::default(),
            &operation(Mep::RequestResponse),
            &valid_request_header(),
            header,
        );
        assert_eq!(
            report.message(),
            "WS-A Action property should be http://example.org/stock/StockQuotePortType/GetQuoteResponse."
        );
        assert_eq!(codes(&report), vec![ViolationCode::ActionMismatch]);
    }

    #[test]
    fn test_response_explicit_output_action() {
        let mut op = operation(Mep::RequestResponse);
        op.output_action = Some("urn:quote:out".to_string());
        let report = validate_response(
            WsaAssertionConfig::default(),
            &op,
            &valid_request_header(),
            "    <wsa:Action>urn:quote:out</wsa:Action>",
        );
        assert!(report.is_success());
    }

    #[test]
    fn test_response_relates_to() {
        let config = WsaAssertionConfig {
            assert_action: false,
            assert_relates_to: true,
            ..Default::default()
        };
        let op = operation(Mep::RequestResponse);

        let report = validate_response(config.clone(), &op, &valid_request_header(), "    <wsa:To>x</wsa:To>");
        assert_eq!(report.message(), "WS-A RelatesTo property is not specified.");

        let report = validate_response(
            config.clone(),
            &op,
            &valid_request_header(),
            "    <wsa:RelatesTo></wsa:RelatesTo>",
        );
        assert_eq!(report.message(), "WS-A RelatesTo property is empty.");

        let report = validate_response(
            config,
            &op,
            &valid_request_header(),
            "    <wsa:RelatesTo>urn:uuid:other</wsa:RelatesTo>",
        );
        assert_eq!(
            report.message(),
            "WS-A RelatesTo property is not equal to request wsa:MessageId."
        );
    }

    #[test]
    fn test_response_reply_to_anonymous_policy() {
        let mut op = operation(Mep::RequestResponse);
        op.anonymous = AnonymousPolicy::Required;
        let header = r#"    <wsa:Action>http://example.org/stock/StockQuotePortType/GetQuoteResponse</wsa:Action>
    <wsa:ReplyTo><wsa:Address>http://example.org/elsewhere</wsa:Address></wsa:ReplyTo>"#;
        let report = validate_response(WsaAssertionConfig::default(), &op, &valid_request_header(), header);
        assert_eq!(
            report.message(),
            "WS-A InvalidAddressingHeader ReplyTo , Anonymous addresses are required."
        );
    }

    #[test]
    fn test_response_reply_to_ref_params() {
        let request_header = r#"    <wsa:MessageID>urn:uuid:req-1</wsa:MessageID>
    <wsa:ReplyTo>
      <wsa:Address>http://example.org/callback</wsa:Address>
      <wsa:ReferenceParameters>
        <app:X xmlns:app="http://example.org/app">1</app:X>
        <app:Y xmlns:app="http://example.org/app">2</app:Y>
      </wsa:ReferenceParameters>
    </wsa:ReplyTo>"#;
        let response_header = r#"    <app:X xmlns:app="http://example.org/app" wsa:IsReferenceParameter="true">1</app:X>"#;
        let config = WsaAssertionConfig {
            assert_action: false,
            assert_reply_to_ref_params: true,
            ..Default::default()
        };
        let report = validate_response(config, &operation(Mep::RequestResponse), request_header, response_header);
        assert_eq!(
            report.message(),
            "Response does not have request ReferenceProperty Y."
        );
        assert_eq!(report.violations()[0].location.as_deref(), Some("Y"));

        // toggle off: nothing checked
        let report = validate_response(
            WsaAssertionConfig {
                assert_action: false,
                ..Default::default()
            },
            &operation(Mep::RequestResponse),
            request_header,
            response_header,
        );
        assert!(report.is_success());
    }

    #[test]
    fn test_response_fault_to_ref_params() {
        let request_header = r#"    <wsa:FaultTo>
      <wsa:Address>http://example.org/faults</wsa:Address>
      <wsa:ReferenceParameters>
        <app:Tenant xmlns:app="http://example.org/app">t1</app:Tenant>
      </wsa:ReferenceParameters>
    </wsa:FaultTo>"#;
        let config = WsaAssertionConfig {
            assert_action: false,
            assert_fault_to_ref_params: true,
            ..Default::default()
        };
        let report = validate_response(config, &operation(Mep::RequestResponse), request_header, "    <wsa:To>x</wsa:To>");
        assert_eq!(
            report.message(),
            "Response does not have request ReferenceProperty Tenant."
        );
    }

    #[test]
    fn test_response_violations_in_rule_order() {
        let mut op = operation(Mep::RequestResponse);
        op.anonymous = AnonymousPolicy::Prohibited;
        let config = WsaAssertionConfig {
            assert_action: true,
            assert_to: true,
            assert_relates_to: true,
            ..Default::default()
        };
        let header = format!(
            "    <wsa:FaultTo><wsa:Address>{}</wsa:Address></wsa:FaultTo>",
            ANON_2005
        );
        let report = validate_response(config, &op, &valid_request_header(), &header);
        assert_eq!(
            codes(&report),
            vec![
                ViolationCode::MissingProperty,
                ViolationCode::MissingProperty,
                ViolationCode::AnonymousProhibited,
                ViolationCode::MissingProperty,
            ]
        );
        let locations: Vec<_> = report
            .violations()
            .iter()
            .map(|v| v.location.clone().unwrap_or_default())
            .collect();
        assert_eq!(locations, vec!["Action", "To", "FaultTo", "RelatesTo"]);
    }
}
