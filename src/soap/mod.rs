//! SOAP 1.1 plumbing for the Sportsdata.asmx endpoint.
//!
//! The service's operations are flat (a name plus a handful of scalar
//! parameters), so request envelopes are assembled by hand instead of going
//! through a WSDL-driven binding. On the way back the response is walked
//! generically: whatever element children sit inside `<{Operation}Result>`
//! become [`Record`]s, with no expectations about their shape.

use crate::record::direct_text;
use crate::{Error, Record};

/// Target namespace of the Sportsdata webservice.
pub const TARGET_NAMESPACE: &str = "http://msiggi.de/Sportsdata/Webservices";

/// `SOAPAction` URI for an operation, without the surrounding quotes.
pub(crate) fn soap_action(operation: &str) -> String {
    format!("{}/{}", TARGET_NAMESPACE, operation)
}

/// Request envelope for one operation call. Parameters are emitted as child
/// elements in the order given, which is the order the service declares them
/// in.
pub(crate) fn envelope(operation: &str, params: &[(&str, String)]) -> String {
    let mut arguments = String::new();
    for (name, value) in params {
        arguments.push_str(&format!(
            "<{name}>{value}</{name}>",
            name = name,
            value = escape(value)
        ));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body>"#,
            r#"<{operation} xmlns="{namespace}">{arguments}</{operation}>"#,
            r#"</soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        operation = operation,
        namespace = TARGET_NAMESPACE,
        arguments = arguments
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// One [`Record`] per element child of the result element, in document
/// order. A result element with no children, or no result element at all in
/// an otherwise well-formed response, yields an empty list.
pub(crate) fn result_records(body: &str, operation: &str) -> Result<Vec<Record>, Error> {
    let doc = roxmltree::Document::parse(body)?;
    check_fault(&doc)?;
    let records = match result_element(&doc, operation) {
        Some(result) => result
            .children()
            .filter(|c| c.is_element())
            .map(Record::from_element)
            .collect(),
        None => vec![],
    };
    Ok(records)
}

/// For operations that return a single object the result element itself is
/// the record.
pub(crate) fn result_record(body: &str, operation: &str) -> Result<Option<Record>, Error> {
    let doc = roxmltree::Document::parse(body)?;
    check_fault(&doc)?;
    Ok(result_element(&doc, operation).map(Record::from_element))
}

/// Text content of the result element, for scalar-valued operations.
pub(crate) fn result_text(body: &str, operation: &str) -> Result<String, Error> {
    let doc = roxmltree::Document::parse(body)?;
    check_fault(&doc)?;
    match result_element(&doc, operation) {
        Some(result) => Ok(direct_text(result)),
        None => Err(Error::MissingResult(operation.to_string())),
    }
}

fn result_element<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    operation: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    let wanted = format!("{}Result", operation);
    doc.root()
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == wanted)
}

/// A `soap:Fault` in the body becomes [`Error::Fault`] with the faultcode
/// and faultstring passed through verbatim.
pub(crate) fn check_fault(doc: &roxmltree::Document) -> Result<(), Error> {
    let fault = doc
        .root()
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Fault");
    match fault {
        Some(fault) => {
            let field = |name: &str| {
                fault
                    .descendants()
                    .find(|n| n.is_element() && n.tag_name().name() == name)
                    .and_then(|n| n.text())
                    .unwrap_or_default()
                    .to_string()
            };
            Err(Error::Fault {
                code: field("faultcode"),
                message: field("faultstring"),
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wraps `inner` the way Sportsdata.asmx wraps its results.
    fn response(operation: &str, inner: &str) -> String {
        format!(
            concat!(
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<soap:Body>"#,
                r#"<{op}Response xmlns="{ns}"><{op}Result>{inner}</{op}Result></{op}Response>"#,
                r#"</soap:Body>"#,
                r#"</soap:Envelope>"#
            ),
            op = operation,
            ns = TARGET_NAMESPACE,
            inner = inner
        )
    }

    const TWO_MATCHES: &str = concat!(
        "<Spiel><Team1>Team A</Team1><Team2>Team B</Team2><MatchID>42</MatchID></Spiel>",
        "<Spiel><Team1>Team C</Team1><Team2>Team D</Team2><MatchID>43</MatchID></Spiel>",
    );

    #[test]
    fn two_matches_map_to_two_records_in_order() {
        let body = response("GetMatchdataByLeagueSaison", TWO_MATCHES);
        let records = result_records(&body, "GetMatchdataByLeagueSaison").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Team1"), Some("Team A"));
        assert_eq!(records[0].get("Team2"), Some("Team B"));
        assert_eq!(records[0].get("MatchID"), Some("42"));
        assert_eq!(records[1].get("Team1"), Some("Team C"));
        assert_eq!(records[1].get("Team2"), Some("Team D"));
        assert_eq!(records[1].get("MatchID"), Some("43"));
    }

    #[test]
    fn mapping_is_a_pure_function_of_the_body() {
        let body = response("GetMatchdataByLeagueSaison", TWO_MATCHES);
        let first = result_records(&body, "GetMatchdataByLeagueSaison").unwrap();
        let second = result_records(&body, "GetMatchdataByLeagueSaison").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_result_element_yields_an_empty_list() {
        let body = response("GetAvailLeagues", "");
        let records = result_records(&body, "GetAvailLeagues").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_result_element_yields_an_empty_list() {
        // GetGoalsByMatch answers with a bare response element when the
        // match has no goals.
        let body = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><GetGoalsByMatchResponse/></soap:Body>"#,
            r#"</soap:Envelope>"#
        );
        let records = result_records(body, "GetGoalsByMatch").unwrap();
        assert!(records.is_empty());
        assert!(result_record(body, "GetGoalsByMatch").unwrap().is_none());
    }

    #[test]
    fn childless_repeating_elements_become_empty_records() {
        let body = response("GetAvailSports", "<Sport/><Sport/>");
        let records = result_records(&body, "GetAvailSports").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn unknown_tag_names_are_accepted() {
        let body = response(
            "GetAvailLeagues",
            "<League><somethingNew>x</somethingNew></League>",
        );
        let records = result_records(&body, "GetAvailLeagues").unwrap();
        assert_eq!(records[0].get("somethingNew"), Some("x"));
    }

    #[test]
    fn single_object_result_maps_the_result_element_itself() {
        let body = response(
            "GetCurrentGroup",
            "<groupName>14. Spieltag</groupName><groupOrderID>14</groupOrderID>",
        );
        let record = result_record(&body, "GetCurrentGroup").unwrap().unwrap();
        assert_eq!(record.get("groupName"), Some("14. Spieltag"));
        assert_eq!(record.get("groupOrderID"), Some("14"));
    }

    #[test]
    fn scalar_result_is_the_result_elements_text() {
        let body = response("GetCurrentGroupOrderID", "14");
        let text = result_text(&body, "GetCurrentGroupOrderID").unwrap();
        assert_eq!(text, "14");
    }

    #[test]
    fn scalar_without_result_element_is_an_error() {
        let body = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><GetCurrentGroupOrderIDResponse/></soap:Body>"#,
            r#"</soap:Envelope>"#
        );
        let err = result_text(body, "GetCurrentGroupOrderID").unwrap_err();
        assert!(matches!(err, Error::MissingResult(op) if op == "GetCurrentGroupOrderID"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = result_records("<soap:Envelope", "GetAvailLeagues").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn soap_fault_is_passed_through() {
        let body = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><soap:Fault>"#,
            r#"<faultcode>soap:Server</faultcode>"#,
            r#"<faultstring>Server was unable to process request.</faultstring>"#,
            r#"</soap:Fault></soap:Body>"#,
            r#"</soap:Envelope>"#
        );
        let err = result_records(body, "GetAvailLeagues").unwrap_err();
        match err {
            Error::Fault { code, message } => {
                assert_eq!(code, "soap:Server");
                assert_eq!(message, "Server was unable to process request.");
            }
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn envelope_keeps_parameter_order() {
        let body = envelope(
            "GetMatchdataByGroupLeagueSaison",
            &[
                ("groupOrderID", "14".to_string()),
                ("leagueShortcut", "bl1".to_string()),
                ("leagueSaison", "2010".to_string()),
            ],
        );
        let arguments = concat!(
            "<groupOrderID>14</groupOrderID>",
            "<leagueShortcut>bl1</leagueShortcut>",
            "<leagueSaison>2010</leagueSaison>"
        );
        assert!(body.contains(arguments));
        assert!(body.contains(r#"<GetMatchdataByGroupLeagueSaison xmlns="http://msiggi.de/Sportsdata/Webservices">"#));
    }

    #[test]
    fn envelope_escapes_string_parameters() {
        let body = envelope("GetAvailGroups", &[("leagueShortcut", "a<b&c".to_string())]);
        assert!(body.contains("<leagueShortcut>a&lt;b&amp;c</leagueShortcut>"));
    }

    #[test]
    fn soap_action_names_the_operation() {
        assert_eq!(
            soap_action("GetTeamsByLeagueSaison"),
            "http://msiggi.de/Sportsdata/Webservices/GetTeamsByLeagueSaison"
        );
    }
}
