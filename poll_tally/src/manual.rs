/*!

This is the long-form manual for `poll_tally` and `pollparser`.

## Input format

The input is a zip archive holding up to two text files.

### `users.txt`

One participant per line: an integer id, a tab, and a name.

```text
1	Bob
2	Amy
3	Cy
```

### `favourites.txt`

One vote per line: the integer id of the voter, a space, and a colour.

```text
1 red
2 red
3 blue
```

Notes:
- fields are split on the first separator only: `3 light blue` is a vote for `light blue`
- surrounding whitespace is trimmed from every field
- a line with a missing separator, an id that is not an integer, or an empty
name or colour is reported and skipped. The other lines are still read.
- a missing file in the archive is reported and treated as empty
- a vote may reference an id absent from `users.txt`. It is counted, but no
name is listed for it.

## Outcome

The most voted colour wins. Every vote row counts, so a participant voting twice for
the same colour adds two votes. When colours are tied, the colour voted first in
`favourites.txt` wins, unless `--tiebreak alphabetical` is given.

The participants who voted for the winning colour are listed once each, ordered by name
(byte-wise, so upper case names come before lower case names).

## Command line

```bash
pollparser data.zip
```

Without an argument, `pollparser` asks for the path of the archive (press enter for `data.zip`).
It then shows a menu to print the winning colour or the list of voters.

Other options:
* `--batch` prints both results and exits
* `--out <file>` writes a JSON summary (`--out stdout` prints it)
* `--reference <file>` checks the JSON summary against a reference file
* `--verbose` turns on debug logging. The `RUST_LOG` variable is also honoured.

*/
