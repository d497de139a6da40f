use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, map_res, opt, value, verify},
    multi::many0,
    sequence::{delimited, preceded, separated_pair, tuple},
    Finish,
    IResult,
};
use crate::element::Element;
use crate::error::{Error, Result};

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || "_-.:".contains(c)
}

fn name(i: &str) -> IResult<&str, &str> {
    take_while1(is_name_char)(i)
}

fn comment(i: &str) -> IResult<&str, ()> {
    value((), tuple((tag("<!--"), take_until("-->"), tag("-->"))))(i)
}

fn prolog(i: &str) -> IResult<&str, ()> {
    value((), tuple((tag("<?"), take_until("?>"), tag("?>"))))(i)
}

/// Whitespace and comments between elements
fn misc(i: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace1), comment))))(i)
}

fn unescape(raw: &str) -> std::result::Result<String, ()> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start + 1..];
        let end = rest.find(';').ok_or(())?;
        let entity = &rest[..end];
        let c = match entity {
            "amp"  => '&',
            "lt"   => '<',
            "gt"   => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).map_err(|_| ())?
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().map_err(|_| ())?
                } else {
                    return Err(());
                };
                char::from_u32(code).ok_or(())?
            }
        };
        out.push(c);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn quoted(i: &str) -> IResult<&str, String> {
    map_res(
        alt((
            delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
            delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        )),
        unescape,
    )(i)
}

fn attribute(i: &str) -> IResult<&str, (String, String)> {
    map(
        separated_pair(name, delimited(multispace0, char('='), multispace0), quoted),
        |(k, v)| (k.to_owned(), v),
    )(i)
}

fn element(i: &str) -> IResult<&str, Element> {
    let (i, tag_name) = preceded(char('<'), name)(i)?;
    let (i, attributes) = many0(preceded(multispace1, attribute))(i)?;
    let (i, _) = multispace0(i)?;
    let mut node = Element::new(tag_name);
    for (k, v) in attributes {
        node.set_attribute(k, v);
    }
    let (i, closed) = opt(tag("/>"))(i)?;
    if closed.is_some() {
        return Ok((i, node));
    }
    let (i, _) = char('>')(i)?;
    let (i, children) = many0(preceded(misc, element))(i)?;
    let (i, _) = tuple((
        misc,
        tag("</"),
        verify(name, |closing: &str| closing == tag_name),
        multispace0,
        char('>'),
    ))(i)?;
    for child in children {
        node.push(child);
    }
    Ok((i, node))
}

fn document(i: &str) -> IResult<&str, Element> {
    all_consuming(delimited(tuple((misc, opt(prolog), misc)), element, misc))(i)
}

/// Parses a complete document and returns its root element.
pub fn parse(input: &str) -> Result<Element> {
    document(input)
        .finish()
        .map(|(_, root)| root)
        .map_err(|e| Error::Markup { at: input.len() - e.input.len(), reason: format!("{:?}", e.code) })
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::element::Element;
    use crate::error::{Error, ErrorKind};

    #[test]
    fn compact() {
        let root = parse("<serialization><std_pair><first val=\"1\"/><second val=\"2\"/></std_pair></serialization>").unwrap();
        assert_eq!("serialization", root.name());
        let pair = root.child("std_pair").unwrap();
        assert_eq!(Some("1"), pair.child("first").unwrap().attribute("val"));
        assert_eq!(Some("2"), pair.child("second").unwrap().attribute("val"));
    }

    #[test]
    fn prolog_comments_and_whitespace() {
        let input = "<?xml version=\"1.0\"?>\n<!-- written by hand -->\n<serialization>\n  <s.a val = '5' />\n  <!-- inner -->\n</serialization >\n";
        let root = parse(input).unwrap();
        assert_eq!(Some("5"), root.child("s.a").unwrap().attribute("val"));
    }

    #[test]
    fn entities() {
        let root = parse("<r val=\"a&lt;b &amp; &quot;c&quot;&#xA;&#0;&#65;&apos;\"/>").unwrap();
        assert_eq!(Some("a<b & \"c\"\n\0A'"), root.attribute("val"));
    }

    #[test]
    fn written_documents_parse_back() {
        let mut root = Element::new("serialization");
        let mut child = Element::new("str");
        child.set_attribute("val", "<tricky> & \"quoted\"\t\r\n\u{1}");
        root.push(child);
        assert_eq!(root, parse(&root.to_string()).unwrap());
        assert_eq!(root, parse(&format!("{:#}", root)).unwrap());
    }

    #[test]
    fn malformed() {
        for input in [
            "",
            "<a>",
            "<a></b>",
            "<a><b/>text</a>",
            "<a val=\"1/>",
            "<a val=\"&bogus;\"/>",
            "<a/><b/>",
        ] {
            let e = parse(input).unwrap_err();
            assert!(matches!(e, Error::Markup { .. }), "{}", input);
            assert_eq!(ErrorKind::Format, e.kind());
        }
    }

    #[test]
    fn error_offset() {
        match parse("<a></b>").unwrap_err() {
            Error::Markup { at, .. } => assert!(at >= 3),
            e => panic!("unexpected {}", e),
        }
    }
}
