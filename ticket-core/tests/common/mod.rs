//! Sample e-mail bodies shared by the integration tests

#![allow(dead_code)]

/// KIU receipt with a parenthesized city after the passenger name
pub const KIU_RECEIPT: &str = "\
ESTELAR LATINOAMERICA C.A.
AV. FRANCISCO DE MIRANDA, TORRE PROVINCIAL B
CARACAS VENEZUELA
RIF: J-40155004-0

ELECTRONIC TICKET
PASSENGER ITINERARY RECEIPT

ISSUE AGENT/AGENTE EMISOR: CCS00ES3T
ISSUE DATE/FECHA DE EMISION: 15 JAN 2024 10:23
NAME/NOMBRE: DUQUE ECHEVERRY/OSCA (CIUDAD DE PANAMA) (PANAMA)
FOID/D.IDENTIDAD: IDEPPE151144 OFFICE ID: US-16445-0
TICKET NUMBER/NRO DE BOLETO: 3082345678901
BOOKING REF./CODIGO DE RESERVA: C1/QWERTY

FROM/TO          FLIGHT  CL DATE  DEP  FARE BASIS  NVB   NVA   BAG  ST
CARACAS          ES 0712 Y  20JAN 0730 YOW                     23K  OK
MIAMI

ENDORSEMENTS/ENDOSOS: NON REFUNDABLE
FARE/TARIFA: USD 150.00
TAX/IMPUESTOS: USD 45.20YN 10.00VE
TOTAL: USD 205.20
";

/// KIU receipt in Spanish layout, CRLF line endings, a connection, a bare
/// trailing place name and both identification labels
pub const KIU_RECEIPT_CONNECTION: &str = "AVIOR AIRLINES C.A.\r\n\
AV. PRINCIPAL DE LOS CORTIJOS\r\n\
\r\n\
AGENTE EMISOR: BLA00V3X\r\n\
FECHA DE EMISION: 03ENE24\r\n\
NOMBRE: DUQUE ECHEVERRY/OSCA FLORIDA\r\n\
RANDOM /D.IDENTIDAD: FOID: DUPLICATE777 ADDRESS\r\n\
NRO DE BOLETO: 742-1234567890\r\n\
CODIGO DE RESERVA: C1/ZXCVBN\r\n\
\r\n\
DESDE/HACIA      VUELO   CL FECHA HORA BASE TARIFA      EQ   ST\r\n\
BARCELONA        9V 1210 Y  05ENE 0645 YOW              1PC  OK\r\n\
CARACAS          9V 1500 Y  05ENE 1130 YOW              1PC  OK\r\n\
PANAMA\r\n\
\r\n\
TARIFA: USD 310.00\r\n\
IMPUESTOS: USD 88.10\r\n\
TOTAL: USD 398.10\r\n";

/// The same receipt as an HTML body, fields laid out in table cells
pub const KIU_RECEIPT_HTML: &str = r#"<html>
<head><style>td { font-family: monospace; }</style></head>
<body>
<p>ESTELAR LATINOAMERICA C.A.</p>
<p>PASSENGER ITINERARY RECEIPT</p>
<table>
  <tr><td>NAME/NOMBRE: DUQUE ECHEVERRY/OSCA (PANAMA)</td><td>FOID/D.IDENTIDAD: IDEPPE151144</td></tr>
  <tr><td>TICKET NUMBER/NRO DE BOLETO: 3082345678901</td><td>BOOKING REF./CODIGO DE RESERVA: C1/QWERTY</td></tr>
  <tr><td>TOTAL: USD&nbsp;205.20</td></tr>
</table>
</body>
</html>"#;

/// Spanish HTML receipt with named accented entities
pub const KIU_RECEIPT_HTML_ACCENTS: &str = "<html><body>\
<p>AEROL&Iacute;NEAS ESTELAR C.A.</p>\
<table>\
<tr><td>NOMBRE: MU&Ntilde;OZ/JOS&Eacute; (BOGOT&Aacute;)</td><td>FECHA DE EMISI&Oacute;N: 15/01/2024</td></tr>\
<tr><td>D.IDENTIDAD: CC80012345</td><td>CODIGO DE RESERVA: C1/NNAAMM</td></tr>\
</table>\
<p>OPERADO POR WINGO</p>\
</body></html>";
