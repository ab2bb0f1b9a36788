//! TwiML generation for webhook replies.
//!
//! A reply is a single `<Message>` inside a `<Response>` envelope; the chat
//! provider delivers its text back to the sender.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::Error;

pub const CONTENT_TYPE: &str = "application/xml";

/// Wrap `text` in a TwiML messaging response.
pub fn message(text: &str) -> Result<String, Error> {
  let mut w = Writer::new(Cursor::new(Vec::new()));

  write(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
  write(&mut w, Event::Start(BytesStart::new("Response")))?;
  write(&mut w, Event::Start(BytesStart::new("Message")))?;
  write(&mut w, Event::Text(BytesText::new(text)))?;
  write(&mut w, Event::End(BytesEnd::new("Message")))?;
  write(&mut w, Event::End(BytesEnd::new("Response")))?;

  String::from_utf8(w.into_inner().into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

fn write(w: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), Error> {
  w.write_event(event).map_err(|e| Error::Xml(e.to_string()))
}
